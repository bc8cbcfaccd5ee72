//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tower::ServiceExt;

use docsign_web::config::Settings;
use docsign_web::domain::{
    LimitCounts, LimitsProvider, LimitsSnapshot, ProfileDirectory, PublicProfile, Session,
    SessionProvider, SiteSetting, SiteSettingsProvider, Team, User, SITE_SETTINGS_BANNER_ID,
};
use docsign_web::presentation::http::groups::OpenApiDocument;
use docsign_web::presentation::http::mount::{HandlerGroup, MountGroups, MountTable};
use docsign_web::presentation::http::routes::create_router;
use docsign_web::presentation::middleware::RequestContext;
use docsign_web::shared::error::AppError;
use docsign_web::startup::AppState;

pub const VERIFIED_COOKIE: &str = "session=verified";
pub const UNVERIFIED_COOKIE: &str = "session=unverified";

pub fn team() -> Team {
    Team {
        id: 21,
        name: "Contracts".into(),
        url: "contracts".into(),
    }
}

pub fn session(verified: bool) -> Session {
    Session {
        user: User {
            id: 4,
            name: Some("Test User".into()),
            email: "test@example.com".into(),
            email_verified: verified.then(chrono::Utc::now),
        },
        teams: vec![team()],
        current_team: Some(team()),
    }
}

/// Resolves the two test cookies; counts lookups.
#[derive(Default)]
pub struct StubSessions {
    pub lookups: AtomicUsize,
}

#[async_trait]
impl SessionProvider for StubSessions {
    async fn find_session(&self, headers: &HeaderMap) -> Result<Option<Session>, AppError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let cookie = headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok());

        Ok(match cookie {
            Some(VERIFIED_COOKIE) => Some(session(true)),
            Some(UNVERIFIED_COOKIE) => Some(session(false)),
            _ => None,
        })
    }
}

/// Serves an enabled banner; counts calls.
#[derive(Default)]
pub struct StubSiteSettings {
    pub calls: AtomicUsize,
}

#[async_trait]
impl SiteSettingsProvider for StubSiteSettings {
    async fn site_settings(&self) -> Result<Vec<SiteSetting>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![SiteSetting {
            id: SITE_SETTINGS_BANNER_ID.into(),
            enabled: true,
            data: json!({ "content": "New signing flow available" }),
        }])
    }
}

/// A limits request as the provider saw it: team id and cookie.
pub type LimitsCall = (Option<i64>, Option<String>);

#[derive(Default)]
pub struct StubLimits {
    pub calls: Mutex<Vec<LimitsCall>>,
}

#[async_trait]
impl LimitsProvider for StubLimits {
    async fn limits(
        &self,
        headers: &HeaderMap,
        team_id: Option<i64>,
    ) -> Result<LimitsSnapshot, AppError> {
        let cookie = headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        self.calls.lock().push((team_id, cookie));

        Ok(LimitsSnapshot {
            quota: LimitCounts {
                documents: Some(25),
                recipients: Some(50),
                direct_templates: Some(2),
            },
            remaining: LimitCounts {
                documents: Some(24),
                recipients: Some(50),
                direct_templates: Some(2),
            },
        })
    }
}

/// Knows a single profile, `known`.
pub struct StubProfiles;

#[async_trait]
impl ProfileDirectory for StubProfiles {
    async fn find_by_url(&self, url: &str) -> Result<Option<PublicProfile>, AppError> {
        Ok((url == "known").then(|| PublicProfile {
            url: "known".into(),
            name: "Known Person".into(),
            bio: Some("Signs things".into()),
            templates: Vec::new(),
        }))
    }
}

/// What a handler group received.
#[derive(Debug, Clone)]
pub struct Forwarded {
    pub group: &'static str,
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: String,
}

/// Handler group that records what it was handed and answers with its name.
pub struct RecordingGroup {
    name: &'static str,
    log: Arc<Mutex<Vec<Forwarded>>>,
}

#[async_trait]
impl HandlerGroup for RecordingGroup {
    async fn handle(&self, _ctx: RequestContext, request: Request) -> Result<Response, AppError> {
        let (parts, body) = request.into_parts();
        let body = to_bytes(body, usize::MAX)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        self.log.lock().push(Forwarded {
            group: self.name,
            method: parts.method.to_string(),
            path: parts.uri.path().to_string(),
            content_type: parts
                .headers
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string),
            body: String::from_utf8_lossy(&body).into_owned(),
        });

        Ok((StatusCode::OK, self.name).into_response())
    }
}

/// Handler group that always fails.
pub struct FailingGroup;

#[async_trait]
impl HandlerGroup for FailingGroup {
    async fn handle(&self, _ctx: RequestContext, _request: Request) -> Result<Response, AppError> {
        Err(AppError::upstream("jobs", "queue unavailable"))
    }
}

pub fn openapi_document() -> Value {
    json!({
        "openapi": "3.0.3",
        "info": { "title": "Test API", "version": "2.0.0-beta" },
        "paths": {}
    })
}

/// Test application builder
pub struct TestApp {
    pub router: Router,
    pub sessions: Arc<StubSessions>,
    pub site_settings: Arc<StubSiteSettings>,
    pub limits: Arc<StubLimits>,
    pub forwarded: Arc<Mutex<Vec<Forwarded>>>,
}

impl TestApp {
    /// Create a new test application with stubbed collaborators
    pub fn new() -> Self {
        Self::with_groups(|_| {})
    }

    /// Same as [`TestApp::new`] but the jobs mount always fails.
    pub fn with_failing_jobs() -> Self {
        Self::with_groups(|groups| groups.jobs = Arc::new(FailingGroup))
    }

    /// Recording groups everywhere, then `customize` swaps in others.
    pub fn with_groups(customize: impl FnOnce(&mut MountGroups)) -> Self {
        let settings = Settings::defaults().expect("default settings are valid");
        let forwarded = Arc::new(Mutex::new(Vec::new()));

        let recording = |name: &'static str| -> Arc<dyn HandlerGroup> {
            Arc::new(RecordingGroup {
                name,
                log: forwarded.clone(),
            })
        };

        let mut groups = MountGroups {
            auth: recording("auth"),
            files: recording("files"),
            api_v1: recording("api_v1"),
            jobs: recording("jobs"),
            trpc: recording("trpc"),
            openapi: Arc::new(OpenApiDocument::new(openapi_document())),
            beta_trpc: recording("beta_trpc"),
        };
        customize(&mut groups);

        let sessions = Arc::new(StubSessions::default());
        let site_settings = Arc::new(StubSiteSettings::default());
        let limits = Arc::new(StubLimits::default());

        let state = AppState {
            mounts: Arc::new(MountTable::standard(&settings.api.beta_url, groups)),
            settings: Arc::new(settings),
            sessions: sessions.clone(),
            site_settings: site_settings.clone(),
            limits: limits.clone(),
            profiles: Arc::new(StubProfiles),
        };

        Self {
            router: create_router(state),
            sessions,
            site_settings,
            limits,
            forwarded,
        }
    }

    /// Send a request through the full router
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Make a GET request to the application
    pub async fn get(&self, uri: &str) -> Response {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    /// Make a GET request carrying a session cookie
    pub async fn get_with_cookie(&self, uri: &str, cookie: &str) -> Response {
        self.send(
            Request::builder()
                .uri(uri)
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Names of the groups that received requests, in order
    pub fn forwarded_groups(&self) -> Vec<&'static str> {
        self.forwarded.lock().iter().map(|f| f.group).collect()
    }

    pub fn session_lookups(&self) -> usize {
        self.sessions.lookups.load(Ordering::SeqCst)
    }

    pub fn site_settings_calls(&self) -> usize {
        self.site_settings.calls.load(Ordering::SeqCst)
    }

    pub fn limits_calls(&self) -> Vec<LimitsCall> {
        self.limits.calls.lock().clone()
    }
}

/// Read a response body as JSON
pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read a response body as text
pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Location header of a redirect
pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}
