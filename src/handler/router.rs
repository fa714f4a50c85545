//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for path validation,
//! method checks, body limits, and dispatching to the page handlers.

use crate::config::AppState;
use crate::handler::pages;
use crate::http::{self, FormData, FormError, HttpResponse};
use crate::logger::{self, AccessLogEntry};
use crate::routing::{self, WikiRoute};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, CONTENT_LENGTH, SERVER};
use hyper::{Method, Request};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

const READ_METHODS: &str = "GET, HEAD, OPTIONS";
const WRITE_METHODS: &str = "POST, OPTIONS";

/// Per-request information the page handlers need
pub struct RequestContext {
    pub is_head: bool,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<HttpResponse, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let access_entry = state
        .access_log_enabled()
        .then(|| AccessLogEntry::from_request(&req, peer_addr));

    let mut response = route_request(req, &state).await;
    if let Ok(server_name) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server_name);
    }

    if let Some(mut entry) = access_entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(response.body().size_hint().lower()).unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Validate the path, check method and body size, then dispatch
async fn route_request<B>(req: Request<B>, state: &AppState) -> HttpResponse
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let Some(route) = routing::match_route(req.uri().path()) else {
        logger::log_debug(&format!("No route for {}", req.uri().path()));
        return http::build_404_response();
    };

    let method = req.method().clone();
    if let Some(resp) = check_http_method(&method, &route) {
        return resp;
    }

    let ctx = RequestContext {
        is_head: method == Method::HEAD,
    };
    logger::log_debug(&format!("{method} dispatched to {} handler", route.operation()));

    match route {
        WikiRoute::Home => pages::home(&ctx, state).await,
        WikiRoute::View(title) => pages::view(&ctx, state, title).await,
        WikiRoute::Edit(title) => pages::edit(&ctx, state, title).await,
        WikiRoute::Save(title) => {
            let max_body_size = state.config.http.max_body_size;
            if let Some(resp) = check_body_size(&req, max_body_size) {
                return resp;
            }

            let query = FormData::parse(req.uri().query().unwrap_or_default().as_bytes());
            let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
            match http::read_body(req.into_body(), limit).await {
                Ok(bytes) => pages::save(state, title, &FormData::parse(&bytes), &query).await,
                Err(FormError::TooLarge { limit }) => {
                    logger::log_error(&format!("Request body too large (max: {limit})"));
                    http::build_413_response()
                }
                Err(e) => {
                    logger::log_error(&e.to_string());
                    http::build_500_response(&e.to_string())
                }
            }
        }
    }
}

/// Methods accepted by a route, as listed in `Allow`
const fn allowed_methods(route: &WikiRoute) -> &'static str {
    match route {
        WikiRoute::Save(_) => WRITE_METHODS,
        WikiRoute::Home | WikiRoute::View(_) | WikiRoute::Edit(_) => READ_METHODS,
    }
}

/// Answer OPTIONS and reject methods the route does not accept
fn check_http_method(method: &Method, route: &WikiRoute) -> Option<HttpResponse> {
    let allow = allowed_methods(route);
    let accepted = match route {
        WikiRoute::Save(_) => *method == Method::POST,
        _ => *method == Method::GET || *method == Method::HEAD,
    };

    if accepted {
        None
    } else if *method == Method::OPTIONS {
        Some(http::build_options_response(allow))
    } else {
        logger::log_warning(&format!(
            "Method not allowed: {method} on {} route",
            route.operation()
        ));
        Some(http::build_405_response(allow))
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<HttpResponse> {
    let content_length = req.headers().get(CONTENT_LENGTH)?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}
