//! Initial Page Load Middleware
//!
//! Cross-cutting behaviour applied to every request after the context is
//! attached and before dispatch.

use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, Uri},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::context::RequestContext;
use crate::presentation::http::{found, REQUEST_ID_HEADER};
use crate::startup::AppState;

/// Pages a signed-in user has no business loading.
const AUTH_PAGES: [&str; 2] = ["/signin", "/signup"];

/// Global middleware.
///
/// Page loads are canonicalized (no trailing slash) and signed-in users are
/// sent from the auth pages to the post-login page. Everything else is
/// delegated and the downstream response is returned as is.
pub async fn app_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let context = request.extensions().get::<RequestContext>().cloned();

    let short_circuit = if is_page_load(request.method(), request.uri()) {
        page_load_redirect(
            request.uri(),
            context.as_ref().is_some_and(RequestContext::is_authenticated),
            &state.settings.webapp.post_login_path,
        )
    } else {
        None
    };

    let mut response = match short_circuit {
        Some(response) => response,
        None => next.run(request).await,
    };

    if let Some(context) = context {
        if let Ok(value) = HeaderValue::from_str(&context.request_id().to_string()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
    }

    response
}

fn page_load_redirect(uri: &Uri, authenticated: bool, post_login_path: &str) -> Option<Response> {
    if let Some(location) = canonical_location(uri) {
        tracing::debug!(from = %uri, to = %location, "Canonicalizing page path");
        return Some(Redirect::permanent(&location).into_response());
    }

    if authenticated && AUTH_PAGES.contains(&uri.path()) {
        return Some(found(post_login_path));
    }

    None
}

/// GET/HEAD requests for pages, not for the API or static assets.
fn is_page_load(method: &Method, uri: &Uri) -> bool {
    if method != Method::GET && method != Method::HEAD {
        return false;
    }

    let path = uri.path();
    if path == "/api" || path.starts_with("/api/") {
        return false;
    }

    let last_segment = path.rsplit('/').next().unwrap_or_default();
    !last_segment.contains('.')
}

/// Location without trailing slashes, if the path has any.
fn canonical_location(uri: &Uri) -> Option<String> {
    let path = uri.path();
    if path == "/" || !path.ends_with('/') {
        return None;
    }

    // Leading slashes collapse to one: `//host` reads as a protocol-relative
    // URL to another site.
    let trimmed = format!("/{}", path.trim_matches('/'));

    Some(match uri.query() {
        Some(query) => format!("{}?{}", trimmed, query),
        None => trimmed,
    })
}
