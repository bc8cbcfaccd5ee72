//! Site settings client.

use async_trait::async_trait;
use reqwest::Client;

use super::{endpoint, ensure_success, send_timed};
use crate::domain::{SiteSetting, SiteSettingsProvider};
use crate::shared::error::AppError;

const SERVICE: &str = "site_settings";

/// Fetches `GET {site_settings}/api/site-settings` on every call.
pub struct HttpSiteSettingsProvider {
    client: Client,
    base_url: String,
}

impl HttpSiteSettingsProvider {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl SiteSettingsProvider for HttpSiteSettingsProvider {
    async fn site_settings(&self) -> Result<Vec<SiteSetting>, AppError> {
        let url = endpoint(&self.base_url, &["api", "site-settings"])?;
        let response = send_timed(SERVICE, self.client.get(url)).await?;
        let settings = ensure_success(SERVICE, response).await?.json().await?;
        Ok(settings)
    }
}
