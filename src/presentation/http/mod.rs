//! HTTP Layer
//!
//! Router construction, the sub-app mount table and the handler groups it
//! dispatches to.

pub mod groups;
pub mod handlers;
pub mod mount;
pub mod routes;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// Header carrying the gateway's request id, both upstream and back to the
/// client.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// `302 Found` redirect.
pub fn found(location: &str) -> Response {
    match HeaderValue::try_from(location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(_) => {
            tracing::error!(%location, "Refusing to redirect to an invalid location");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
