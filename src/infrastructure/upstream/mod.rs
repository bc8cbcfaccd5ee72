//! Upstream Services
//!
//! HTTP clients for the sub-services the gateway composes. Each provider
//! implements one of the domain traits; all of them share a single
//! `reqwest::Client` built from [`UpstreamSettings`].

pub mod limits;
pub mod profiles;
pub mod session;
pub mod site_settings;

use std::time::{Duration, Instant};

use axum::http::{header, HeaderMap, HeaderName};
use reqwest::{Client, Response, Url};

use crate::config::UpstreamSettings;
use crate::infrastructure::metrics;
use crate::shared::error::AppError;

pub use limits::HttpLimitsProvider;
pub use profiles::HttpProfileDirectory;
pub use session::HttpSessionProvider;
pub use site_settings::HttpSiteSettingsProvider;

/// Headers that describe a single hop and must not be forwarded.
/// `Content-Length` is end-to-end and stays.
static HOP_BY_HOP: [HeaderName; 6] = [
    header::CONNECTION,
    header::HOST,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
    header::TE,
    header::TRAILER,
];

/// Build the shared upstream client. Redirects are handed back to the
/// caller, never followed.
pub fn build_client(settings: &UpstreamSettings) -> Result<Client, AppError> {
    Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .map_err(AppError::from)
}

/// Copy of `headers` without hop-by-hop entries.
pub fn forwardable_headers(headers: &HeaderMap) -> HeaderMap {
    let mut forwarded = headers.clone();
    for name in HOP_BY_HOP.iter() {
        forwarded.remove(name);
    }
    forwarded.remove("keep-alive");
    forwarded.remove("proxy-connection");
    forwarded
}

/// Resolve `base` + path segments, percent-encoding each segment.
pub fn endpoint(base: &str, segments: &[&str]) -> Result<Url, AppError> {
    let mut url = Url::parse(base)
        .map_err(|e| AppError::Internal(format!("Invalid upstream URL {}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| AppError::Internal(format!("Upstream URL cannot be a base: {}", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Send a prepared request, recording its latency under `service`.
pub(crate) async fn send_timed(
    service: &str,
    request: reqwest::RequestBuilder,
) -> Result<Response, AppError> {
    let started = Instant::now();
    let result = request.send().await;
    metrics::record_upstream_request(service, started.elapsed().as_secs_f64());

    result.map_err(|e| {
        tracing::warn!(%service, "Upstream request failed: {}", e);
        AppError::from(e)
    })
}

/// Turn a non-success status into an upstream error carrying the body text.
pub(crate) async fn ensure_success(service: &str, response: Response) -> Result<Response, AppError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    Err(AppError::upstream(
        service,
        format!("status {}: {}", status, text),
    ))
}
