//! Usage limits client.

use async_trait::async_trait;
use axum::http::{header, HeaderMap, HeaderValue};
use reqwest::Client;

use super::{endpoint, ensure_success, forwardable_headers, send_timed};
use crate::domain::{LimitsProvider, LimitsSnapshot};
use crate::shared::error::AppError;

const SERVICE: &str = "limits";

/// Header naming the team the limits are requested for.
pub const TEAM_ID_HEADER: &str = "team-id";

/// Fetches `GET {limits}/api/limits` with the caller's headers plus a
/// `team-id` header when a team is selected.
pub struct HttpLimitsProvider {
    client: Client,
    base_url: String,
}

impl HttpLimitsProvider {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

/// Caller headers with the team scope applied. The limits request has no
/// body, so the caller's body framing is dropped.
fn limits_headers(headers: &HeaderMap, team_id: Option<i64>) -> HeaderMap {
    let mut headers = forwardable_headers(headers);
    headers.remove(header::CONTENT_LENGTH);
    headers.remove(header::CONTENT_TYPE);
    headers.remove(TEAM_ID_HEADER);
    if let Some(team_id) = team_id {
        headers.insert(TEAM_ID_HEADER, HeaderValue::from(team_id));
    }
    headers
}

#[async_trait]
impl LimitsProvider for HttpLimitsProvider {
    async fn limits(
        &self,
        headers: &HeaderMap,
        team_id: Option<i64>,
    ) -> Result<LimitsSnapshot, AppError> {
        let url = endpoint(&self.base_url, &["api", "limits"])?;
        let request = self.client.get(url).headers(limits_headers(headers, team_id));

        let response = send_timed(SERVICE, request).await?;
        let snapshot = ensure_success(SERVICE, response).await?.json().await?;
        Ok(snapshot)
    }
}
