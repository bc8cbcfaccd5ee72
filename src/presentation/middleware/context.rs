//! Request Context Middleware
//!
//! Resolves the session once per request and attaches a [`RequestContext`]
//! that handlers receive as an explicit argument.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::domain::{Session, Team, User};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Per-request context. Cloning is cheap and every clone sees the same
/// session.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: Uuid,
    session: Option<Arc<Session>>,
}

impl RequestContext {
    pub fn new(session: Option<Session>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            session: session.map(Arc::new),
        }
    }

    pub fn anonymous() -> Self {
        Self::new(None)
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.session().map(|session| &session.user)
    }

    pub fn current_team(&self) -> Option<&Team> {
        self.session().and_then(|session| session.current_team.as_ref())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

/// Attach the request context. Runs before any route logic; a context that
/// is already attached is reused, so the session is looked up at most once.
pub async fn attach_context(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if request.extensions().get::<RequestContext>().is_none() {
        let session = state.sessions.find_session(request.headers()).await?;
        let context = RequestContext::new(session);

        tracing::debug!(
            request_id = %context.request_id(),
            authenticated = context.is_authenticated(),
            "Request context attached"
        );

        request.extensions_mut().insert(context);
    }

    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .ok_or_else(|| AppError::Internal("Request context was not attached".into()))
    }
}
