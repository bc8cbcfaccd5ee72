//! Session lookup against the authentication service.

use async_trait::async_trait;
use axum::http::{header, HeaderMap, StatusCode};
use reqwest::Client;

use super::{endpoint, ensure_success, send_timed};
use crate::domain::{Session, SessionProvider};
use crate::shared::error::AppError;

const SERVICE: &str = "auth";

/// Reads the session from `GET {auth}/api/auth/session`, forwarding the
/// caller's credentials.
pub struct HttpSessionProvider {
    client: Client,
    base_url: String,
}

impl HttpSessionProvider {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl SessionProvider for HttpSessionProvider {
    async fn find_session(&self, headers: &HeaderMap) -> Result<Option<Session>, AppError> {
        let cookie = headers.get(header::COOKIE);
        let authorization = headers.get(header::AUTHORIZATION);

        // Anonymous requests carry nothing the auth service could resolve.
        if cookie.is_none() && authorization.is_none() {
            return Ok(None);
        }

        let url = endpoint(&self.base_url, &["api", "auth", "session"])?;
        let mut request = self.client.get(url);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie.clone());
        }
        if let Some(authorization) = authorization {
            request = request.header(header::AUTHORIZATION, authorization.clone());
        }

        let response = send_timed(SERVICE, request).await?;
        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Ok(None);
        }

        let body: serde_json::Value = ensure_success(SERVICE, response).await?.json().await?;
        parse_session(body)
    }
}

/// The auth service answers `null` or `{}` when nobody is signed in.
fn parse_session(body: serde_json::Value) -> Result<Option<Session>, AppError> {
    match &body {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Object(map) if map.is_empty() => Ok(None),
        _ => serde_json::from_value(body)
            .map(Some)
            .map_err(|e| AppError::upstream(SERVICE, format!("malformed session: {}", e))),
    }
}
