//! Public Profile Layout
//!
//! No authentication gate. Signed-in visitors get the regular navigation
//! header; everyone else gets the public header. A profile that cannot be
//! resolved renders a "not found" view instead of failing the page.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::{HeaderView, LinkView};
use crate::domain::{PublicProfile, Session};
use crate::presentation::middleware::RequestContext;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Scroll offset (px) past which the public header gets its bottom border.
pub const SCROLL_BORDER_THRESHOLD: f64 = 5.0;

/// Loader data: the session, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct PublicProfileLayoutData {
    pub session: Option<Session>,
}

pub fn loader(ctx: &RequestContext) -> PublicProfileLayoutData {
    PublicProfileLayoutData {
        session: ctx.session().cloned(),
    }
}

/// Header for anonymous visitors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicHeaderView {
    pub bordered: bool,
    pub home: LinkView,
    pub prompt: String,
    pub call_to_action: LinkView,
}

impl PublicHeaderView {
    pub fn at_scroll(scroll_y: f64) -> Self {
        Self {
            bordered: scroll_y > SCROLL_BORDER_THRESHOLD,
            home: LinkView::new("Home", "/"),
            prompt: "Like to have your own public profile with agreements?".into(),
            call_to_action: LinkView::new("Create now", "/signup"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "variant", rename_all = "camelCase")]
pub enum ProfileHeader {
    Authenticated(HeaderView),
    Public(PublicHeaderView),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicProfileLayoutView<T> {
    pub header: ProfileHeader,
    pub main: T,
}

/// Render the shell. The server renders at scroll offset zero; the client
/// re-derives the public header from its own scroll position.
pub fn render<T>(data: &PublicProfileLayoutData, scroll_y: f64, main: T) -> PublicProfileLayoutView<T> {
    let header = match &data.session {
        Some(session) => ProfileHeader::Authenticated(HeaderView::new(&session.user, &session.teams)),
        None => ProfileHeader::Public(PublicHeaderView::at_scroll(scroll_y)),
    };

    PublicProfileLayoutView { header, main }
}

/// Error boundary view for an unknown profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileNotFoundView {
    pub status_label: String,
    pub title: String,
    pub message: String,
    pub recovery: LinkView,
}

impl Default for ProfileNotFoundView {
    fn default() -> Self {
        Self {
            status_label: "404 Profile not found".into(),
            title: "Oops! Something went wrong.".into(),
            message: "The profile you are looking for could not be found.".into(),
            recovery: LinkView::new("Go Back", "/"),
        }
    }
}

impl IntoResponse for ProfileNotFoundView {
    fn into_response(self) -> Response {
        (StatusCode::NOT_FOUND, Json(self)).into_response()
    }
}

/// `GET /p/{url}`
pub async fn profile_page(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(url): Path<String>,
) -> Result<Response, AppError> {
    let data = loader(&ctx);

    let profile: Option<PublicProfile> = match state.profiles.find_by_url(&url).await {
        Ok(profile) => profile,
        Err(AppError::NotFound(_)) => None,
        Err(e) => return Err(e),
    };

    match profile {
        Some(profile) => Ok(Json(render(&data, 0.0, profile)).into_response()),
        None => {
            tracing::debug!(request_id = %ctx.request_id(), %url, "Profile not found");
            Ok(ProfileNotFoundView::default().into_response())
        }
    }
}
