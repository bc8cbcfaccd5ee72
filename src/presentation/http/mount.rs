//! Sub-App Mount Table
//!
//! An ordered list of `(pattern, handler group)` pairs. Dispatch walks the
//! list in registration order and hands the request, untouched, to the
//! first entry that matches. Order is part of the contract: an exact route
//! must be registered before any broader prefix that would shadow it.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::Method,
    response::Response,
};

use crate::infrastructure::metrics;
use crate::presentation::middleware::RequestContext;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// An independently owned group of handlers mounted under a path.
#[async_trait]
pub trait HandlerGroup: Send + Sync {
    /// Serve `request`. Errors are returned to the caller unchanged.
    async fn handle(&self, ctx: RequestContext, request: Request) -> Result<Response, AppError>;
}

/// What part of the path an entry claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// The whole path must be equal.
    Exact(String),
    /// The path must start with these whole segments.
    Prefix(String),
}

impl PathPattern {
    /// Segment prefix. A trailing `/*` or `/` is accepted and ignored, so
    /// `/api/jobs/*` and `/api/jobs` are the same pattern.
    pub fn prefix(prefix: &str) -> Self {
        let prefix = prefix.strip_suffix("/*").unwrap_or(prefix);
        Self::Prefix(prefix.trim_end_matches('/').to_string())
    }

    pub fn exact(path: &str) -> Self {
        Self::Exact(path.to_string())
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(expected) => path == expected,
            Self::Prefix(prefix) if prefix.is_empty() => true,
            Self::Prefix(prefix) => match path.strip_prefix(prefix.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(path) => write!(f, "{}", path),
            Self::Prefix(prefix) => write!(f, "{}/*", prefix),
        }
    }
}

/// One registration in the mount table.
pub struct MountEntry {
    name: String,
    pattern: PathPattern,
    method: Option<Method>,
    group: Arc<dyn HandlerGroup>,
}

impl MountEntry {
    /// Mount `group` under a path prefix for every method.
    pub fn route(name: impl Into<String>, prefix: &str, group: Arc<dyn HandlerGroup>) -> Self {
        Self {
            name: name.into(),
            pattern: PathPattern::prefix(prefix),
            method: None,
            group,
        }
    }

    /// Mount `group` on exactly `path` for GET requests only.
    pub fn get(name: impl Into<String>, path: &str, group: Arc<dyn HandlerGroup>) -> Self {
        Self {
            name: name.into(),
            pattern: PathPattern::exact(path),
            method: Some(Method::GET),
            group,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn matches(&self, method: &Method, path: &str) -> bool {
        let method_ok = match &self.method {
            None => true,
            Some(Method::GET) => method == Method::GET || method == Method::HEAD,
            Some(expected) => method == expected,
        };
        method_ok && self.pattern.matches(path)
    }
}

impl fmt::Debug for MountEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountEntry")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

/// The handler groups making up the application, one per mount.
#[derive(Clone)]
pub struct MountGroups {
    pub auth: Arc<dyn HandlerGroup>,
    pub files: Arc<dyn HandlerGroup>,
    pub api_v1: Arc<dyn HandlerGroup>,
    pub jobs: Arc<dyn HandlerGroup>,
    pub trpc: Arc<dyn HandlerGroup>,
    pub openapi: Arc<dyn HandlerGroup>,
    pub beta_trpc: Arc<dyn HandlerGroup>,
}

/// Ordered, first-match-wins dispatch table. Built once at start-up.
#[derive(Debug, Default)]
pub struct MountTable {
    entries: Vec<MountEntry>,
}

impl MountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The application's mounts in their required order. The OpenAPI
    /// document is registered before the beta catch-all so it is not
    /// swallowed by it.
    pub fn standard(beta_url: &str, groups: MountGroups) -> Self {
        let beta_url = beta_url.trim_end_matches('/');

        Self::new()
            .mount(MountEntry::route("auth", "/api/auth", groups.auth))
            .mount(MountEntry::route("files", "/api/files", groups.files))
            .mount(MountEntry::route("api_v1", "/api/v1", groups.api_v1))
            .mount(MountEntry::route("jobs", "/api/jobs/*", groups.jobs))
            .mount(MountEntry::route("trpc", "/api/trpc/*", groups.trpc))
            .mount(MountEntry::get(
                "openapi",
                &format!("{}/openapi.json", beta_url),
                groups.openapi,
            ))
            .mount(MountEntry::route(
                "beta_trpc",
                &format!("{}/*", beta_url),
                groups.beta_trpc,
            ))
    }

    /// Append an entry. Entries registered earlier take precedence.
    pub fn mount(mut self, entry: MountEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn entries(&self) -> &[MountEntry] {
        &self.entries
    }

    /// First entry matching `method` and `path`.
    pub fn resolve(&self, method: &Method, path: &str) -> Option<&MountEntry> {
        self.entries
            .iter()
            .find(|entry| entry.matches(method, path))
    }

    /// Hand `request` to the owning group and return its result unchanged.
    pub async fn dispatch(
        &self,
        ctx: RequestContext,
        request: Request,
    ) -> Result<Response, AppError> {
        let path = request.uri().path().to_string();

        let Some(entry) = self.resolve(request.method(), &path) else {
            metrics::record_dispatch("unmatched", "not_found");
            return Err(AppError::NotFound(format!("No route for {}", path)));
        };

        tracing::debug!(
            request_id = %ctx.request_id(),
            group = %entry.name,
            pattern = %entry.pattern,
            %path,
            "Dispatching to handler group"
        );

        let result = entry.group.handle(ctx, request).await;
        metrics::record_dispatch(
            &entry.name,
            if result.is_ok() { "ok" } else { "error" },
        );
        result
    }
}

/// Router fallback: everything without an explicit route goes through the
/// mount table.
pub async fn dispatch_mounts(
    State(state): State<AppState>,
    ctx: RequestContext,
    request: Request,
) -> Result<Response, AppError> {
    state.mounts.dispatch(ctx, request).await
}
