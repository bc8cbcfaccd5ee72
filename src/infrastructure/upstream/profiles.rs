//! Public profile directory client.

use async_trait::async_trait;
use axum::http::StatusCode;
use reqwest::Client;

use super::{endpoint, ensure_success, send_timed};
use crate::domain::{ProfileDirectory, PublicProfile};
use crate::shared::error::AppError;

const SERVICE: &str = "profiles";

/// Resolves profiles via `GET {profiles}/api/profiles/{url}`; 404 means
/// there is no such profile.
pub struct HttpProfileDirectory {
    client: Client,
    base_url: String,
}

impl HttpProfileDirectory {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ProfileDirectory for HttpProfileDirectory {
    async fn find_by_url(&self, url: &str) -> Result<Option<PublicProfile>, AppError> {
        let endpoint = endpoint(&self.base_url, &["api", "profiles", url])?;
        let response = send_timed(SERVICE, self.client.get(endpoint)).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let profile = ensure_success(SERVICE, response).await?.json().await?;
        Ok(Some(profile))
    }
}
