//! Route Configuration
//!
//! Request flow: context attacher, then the page-load middleware, then the
//! page routes or, for everything else, the mount table. Operational
//! endpoints sit outside that chain.

use axum::{
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};

use super::handlers;
use super::mount::dispatch_mounts;
use crate::infrastructure::metrics;
use crate::presentation::middleware::{app_middleware, attach_context};
use crate::presentation::pages::{authenticated, profile};
use crate::startup::AppState;

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    application_routes(state.clone())
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Pages plus the mount table, behind the context and page-load layers.
fn application_routes(state: AppState) -> Router<AppState> {
    let mut router = Router::new();
    for section in authenticated::AUTHENTICATED_SECTIONS {
        router = router
            .route(section, get(authenticated::authenticated_page))
            .route(
                &format!("{}/{{*rest}}", section),
                get(authenticated::authenticated_page),
            );
    }

    router
        .route("/p/{url}", get(profile::profile_page))
        .fallback(dispatch_mounts)
        // Layers wrap outside-in: the last one added runs first.
        .layer(middleware::from_fn_with_state(state.clone(), app_middleware))
        .layer(middleware::from_fn_with_state(state, attach_context))
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}
