//! Session entity and provider trait.
//!
//! Sessions are owned by the authentication service; the gateway only reads
//! them once per request.

use async_trait::async_trait;
use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Signed-in user as reported by the authentication service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,

    #[serde(default)]
    pub name: Option<String>,

    pub email: String,

    /// When the email address was confirmed, if ever
    #[serde(default)]
    pub email_verified: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_email_verified(&self) -> bool {
        self.email_verified.is_some()
    }
}

/// Team the user belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub url: String,
}

/// Active session: the user, every team they belong to and the team the
/// request is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: User,

    #[serde(default)]
    pub teams: Vec<Team>,

    #[serde(default)]
    pub current_team: Option<Team>,
}

impl Session {
    pub fn current_team_id(&self) -> Option<i64> {
        self.current_team.as_ref().map(|team| team.id)
    }
}

/// Session lookup contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Resolve the session carried by the request headers (cookies or
    /// bearer credentials). `Ok(None)` means the caller is anonymous.
    async fn find_session(&self, headers: &HeaderMap) -> Result<Option<Session>, AppError>;
}
