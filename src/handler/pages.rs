//! Wiki page handlers
//!
//! One function per route. Each takes an already validated title; none of
//! them touch the request path.

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http::{self, FormData, HttpResponse};
use crate::logger;
use crate::page::{Page, Title};

/// Form field carrying the page body on save
pub const BODY_FIELD: &str = "body";

/// `GET /`: render the home template with the `homePage` page, if any
pub async fn home(ctx: &RequestContext, state: &AppState) -> HttpResponse {
    let title = Title::home();
    let page = match state.store.load(&title).await {
        Ok(page) => Some(page),
        Err(e) => {
            logger::log_page_missing(title.as_str(), &e);
            None
        }
    };
    render(ctx, state, "home", page.as_ref())
}

/// `GET /view/<title>`: render the page, or send the client to its editor
pub async fn view(ctx: &RequestContext, state: &AppState, title: Title) -> HttpResponse {
    match state.store.load(&title).await {
        Ok(page) => render(ctx, state, "view", Some(&page)),
        Err(e) => {
            logger::log_page_missing(title.as_str(), &e);
            http::build_redirect_response(&format!("/edit/{title}"))
        }
    }
}

/// `GET /edit/<title>`: render the edit form, empty for pages not yet written
pub async fn edit(ctx: &RequestContext, state: &AppState, title: Title) -> HttpResponse {
    let page = match state.store.load(&title).await {
        Ok(page) => page,
        Err(e) => {
            logger::log_page_missing(title.as_str(), &e);
            Page::empty(title)
        }
    };
    render(ctx, state, "edit", Some(&page))
}

/// `POST /save/<title>`: persist the submitted body and show the result.
///
/// Fields in the request body take precedence over the query string. A
/// submission without a `body` field stores an empty page.
pub async fn save(
    state: &AppState,
    title: Title,
    form: &FormData,
    query: &FormData,
) -> HttpResponse {
    let body = form
        .get(BODY_FIELD)
        .or_else(|| query.get(BODY_FIELD))
        .unwrap_or_default()
        .to_vec();
    let page = Page::new(title, body);

    match state.store.save(&page).await {
        Ok(()) => {
            logger::log_page_saved(page.title.as_str(), page.body.len());
            http::build_redirect_response(&format!("/view/{}", page.title))
        }
        Err(e) => {
            logger::log_error(&format!("Failed to save page: {e}"));
            http::build_500_response(&e.to_string())
        }
    }
}

/// Render a template into a complete response.
///
/// The whole document is produced before the response is built, so a
/// failing template yields a clean 500 and nothing else.
fn render(
    ctx: &RequestContext,
    state: &AppState,
    template: &str,
    page: Option<&Page>,
) -> HttpResponse {
    match state.templates.render(template, page) {
        Ok(html) => http::build_html_response(html, ctx.is_head),
        Err(e) => {
            logger::log_render_error(template, &e);
            http::build_500_response(&e.to_string())
        }
    }
}
