//! Request handler module
//!
//! Request validation and dispatch (`router`) and the wiki page handlers
//! (`pages`).

pub mod pages;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
