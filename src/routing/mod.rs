//! Routing module
//!
//! Validates request paths against the wiki's URL scheme and extracts page
//! titles. This is the only place a title enters the system from a URL.

mod matcher;

pub use matcher::{match_route, WikiRoute};
