//! Authenticated Layout
//!
//! Wraps every page of the signed-in area. Visitors without a session are
//! redirected to the sign-in page before anything else is fetched.

use axum::{
    extract::State,
    http::{HeaderMap, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::{HeaderView, LayoutOutcome};
use crate::domain::{
    LimitsProvider, LimitsSnapshot, SiteBanner, SiteSettingsProvider, Team, User,
};
use crate::presentation::http::found;
use crate::presentation::middleware::RequestContext;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Top-level sections rendered inside this layout.
pub const AUTHENTICATED_SECTIONS: [&str; 4] = ["/documents", "/templates", "/settings", "/inbox"];

/// Everything the layout loaded for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedLayoutData {
    pub user: User,
    pub teams: Vec<Team>,
    pub banner: Option<SiteBanner>,
    pub limits: LimitsSnapshot,
    pub team_id: Option<i64>,
}

/// Collaborators the loader reads from.
pub struct AuthenticatedLayout<'a> {
    pub site_settings: &'a dyn SiteSettingsProvider,
    pub limits: &'a dyn LimitsProvider,
    pub signin_path: &'a str,
}

impl<'a> AuthenticatedLayout<'a> {
    pub fn from_state(state: &'a AppState) -> Self {
        Self {
            site_settings: state.site_settings.as_ref(),
            limits: state.limits.as_ref(),
            signin_path: &state.settings.webapp.signin_path,
        }
    }

    /// Gate on the session, then read the banner and the current team's
    /// limits, in that order.
    pub async fn load(
        &self,
        ctx: &RequestContext,
        headers: &HeaderMap,
    ) -> Result<LayoutOutcome<AuthenticatedLayoutData>, AppError> {
        let Some(session) = ctx.session() else {
            return Ok(LayoutOutcome::Redirect(self.signin_path.to_string()));
        };

        let banner = SiteBanner::find_in(self.site_settings.site_settings().await?)?;

        let team_id = session.current_team_id();
        let limits = self.limits.limits(headers, team_id).await?;

        Ok(LayoutOutcome::Render(AuthenticatedLayoutData {
            user: session.user.clone(),
            teams: session.teams.clone(),
            banner,
            limits,
            team_id,
        }))
    }
}

/// Limits handed to the client-side limits context.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitsContext {
    pub initial_value: LimitsSnapshot,
    pub team_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyEmailBanner {
    pub email: String,
}

/// The rendered shell around `main`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedLayoutView<T> {
    pub limits: LimitsContext,
    pub verify_email_banner: Option<VerifyEmailBanner>,
    pub app_banner: Option<SiteBanner>,
    pub header: HeaderView,
    pub main: T,
}

pub fn render<T>(data: AuthenticatedLayoutData, main: T) -> AuthenticatedLayoutView<T> {
    let verify_email_banner = (!data.user.is_email_verified()).then(|| VerifyEmailBanner {
        email: data.user.email.clone(),
    });

    AuthenticatedLayoutView {
        header: HeaderView::new(&data.user, &data.teams),
        limits: LimitsContext {
            initial_value: data.limits,
            team_id: data.team_id,
        },
        verify_email_banner,
        app_banner: data.banner.filter(|banner| banner.enabled),
        main,
    }
}

/// Nested view: the section the visitor asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionOutlet {
    pub path: String,
}

/// Handler for the authenticated sections.
pub async fn authenticated_page(
    State(state): State<AppState>,
    ctx: RequestContext,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let layout = AuthenticatedLayout::from_state(&state);

    match layout.load(&ctx, &headers).await? {
        LayoutOutcome::Redirect(location) => {
            tracing::debug!(request_id = %ctx.request_id(), %location, "No session, redirecting");
            Ok(found(&location))
        }
        LayoutOutcome::Render(data) => {
            let outlet = SectionOutlet {
                path: uri.path().to_string(),
            };
            Ok(Json(render(data, outlet)).into_response())
        }
    }
}
