//! Handler Groups
//!
//! The gateway owns none of the mounted sub-applications. Each one is an
//! [`UpstreamGroup`] forwarding to its service, except the beta OpenAPI
//! document which is served from memory.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{Body, HttpBody},
    extract::Request,
    http::{header, HeaderMap, HeaderValue, Uri},
    response::{IntoResponse, Response},
    Json,
};
use reqwest::{Client, Url};
use serde_json::{json, Value};

use super::mount::HandlerGroup;
use super::REQUEST_ID_HEADER;
use crate::config::Settings;
use crate::infrastructure::upstream::{forwardable_headers, send_timed};
use crate::presentation::middleware::RequestContext;
use crate::shared::error::AppError;

/// Forwards requests verbatim (method, path, query, headers, body) to a
/// sub-service and streams its response back.
pub struct UpstreamGroup {
    service: String,
    base_url: Url,
    client: Client,
}

impl UpstreamGroup {
    pub fn new(service: impl Into<String>, base_url: &str, client: Client) -> Result<Self, AppError> {
        let service = service.into();
        let base_url = Url::parse(base_url).map_err(|e| {
            AppError::Internal(format!("Invalid {} upstream URL {}: {}", service, base_url, e))
        })?;

        Ok(Self {
            service,
            base_url,
            client,
        })
    }

    /// Upstream URL for an inbound URI. The inbound path is appended to any
    /// path the base URL already has.
    pub fn target_url(&self, uri: &Uri) -> Url {
        let mut url = self.base_url.clone();
        let path = format!("{}{}", self.base_url.path().trim_end_matches('/'), uri.path());
        url.set_path(&path);
        url.set_query(uri.query());
        url
    }
}

#[async_trait]
impl HandlerGroup for UpstreamGroup {
    async fn handle(&self, ctx: RequestContext, request: Request) -> Result<Response, AppError> {
        let (parts, body) = request.into_parts();
        let url = self.target_url(&parts.uri);

        let framed = has_body(&parts.headers) || !body.is_end_stream();
        let mut headers = forwardable_headers(&parts.headers);
        if let Ok(value) = HeaderValue::from_str(&ctx.request_id().to_string()) {
            headers.insert(REQUEST_ID_HEADER, value);
        }

        let mut upstream = self.client.request(parts.method, url);
        if framed {
            // An explicit Content-Length keeps the client's framing on the
            // streamed body; without one the body goes out chunked.
            upstream = upstream.body(reqwest::Body::wrap_stream(body.into_data_stream()));
        }
        let upstream = upstream.headers(headers);

        let response = send_timed(&self.service, upstream).await?;

        let mut builder = Response::builder().status(response.status());
        if let Some(target) = builder.headers_mut() {
            *target = forwardable_headers(response.headers());
        }

        builder
            .body(Body::from_stream(response.bytes_stream()))
            .map_err(|e| AppError::Internal(format!("Failed to build proxied response: {}", e)))
    }
}

/// Whether the inbound headers frame a body at all.
fn has_body(headers: &HeaderMap) -> bool {
    let content_length = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());

    match content_length {
        Some(length) => length > 0,
        None => headers.contains_key(header::TRANSFER_ENCODING),
    }
}

/// Serves the beta API's OpenAPI document.
pub struct OpenApiDocument {
    document: Arc<Value>,
}

impl OpenApiDocument {
    pub fn new(document: Value) -> Self {
        Self {
            document: Arc::new(document),
        }
    }

    /// Load the configured document, or describe the beta API with an empty
    /// path set when none is configured.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let document = match &settings.api.openapi_document {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    anyhow::anyhow!("Failed to read OpenAPI document {}: {}", path, e)
                })?;
                serde_json::from_str(&raw).map_err(|e| {
                    anyhow::anyhow!("OpenAPI document {} is not valid JSON: {}", path, e)
                })?
            }
            None => json!({
                "openapi": "3.0.3",
                "info": {
                    "title": settings.api.openapi_title,
                    "version": "2.0.0-beta",
                },
                "servers": [{ "url": settings.webapp.url_for(&settings.api.beta_url) }],
                "paths": {},
            }),
        };

        Ok(Self::new(document))
    }

    pub fn document(&self) -> &Value {
        &self.document
    }
}

#[async_trait]
impl HandlerGroup for OpenApiDocument {
    async fn handle(&self, _ctx: RequestContext, _request: Request) -> Result<Response, AppError> {
        Ok(Json(self.document.as_ref().clone()).into_response())
    }
}
