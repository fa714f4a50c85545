//! HTTP protocol layer module
//!
//! Response builders and request-body helpers, decoupled from wiki semantics.

pub mod form;
pub mod response;

pub use form::{read_body, FormData, FormError};
pub use response::{
    build_404_response, build_405_response, build_413_response, build_500_response,
    build_html_response, build_options_response, build_redirect_response, HttpResponse,
};
