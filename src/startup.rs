//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;

use crate::config::Settings;
use crate::domain::{LimitsProvider, ProfileDirectory, SessionProvider, SiteSettingsProvider};
use crate::infrastructure::upstream::{
    self, HttpLimitsProvider, HttpProfileDirectory, HttpSessionProvider, HttpSiteSettingsProvider,
};
use crate::presentation::http::groups::{OpenApiDocument, UpstreamGroup};
use crate::presentation::http::handlers::health;
use crate::presentation::http::mount::{HandlerGroup, MountGroups, MountTable};
use crate::presentation::http::routes;
use crate::presentation::middleware::{cors, logging};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub mounts: Arc<MountTable>,
    pub sessions: Arc<dyn SessionProvider>,
    pub site_settings: Arc<dyn SiteSettingsProvider>,
    pub limits: Arc<dyn LimitsProvider>,
    pub profiles: Arc<dyn ProfileDirectory>,
}

impl AppState {
    /// Wire every collaborator to its configured upstream service.
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let upstreams = &settings.upstreams;
        let client = upstream::build_client(upstreams).context("Failed to build HTTP client")?;

        let proxy = |service: &str, base_url: &str| -> Result<Arc<dyn HandlerGroup>> {
            let group = UpstreamGroup::new(service, base_url, client.clone())
                .with_context(|| format!("Failed to configure the {} mount", service))?;
            Ok(Arc::new(group))
        };

        let groups = MountGroups {
            auth: proxy("auth", &upstreams.auth)?,
            files: proxy("files", &upstreams.files)?,
            api_v1: proxy("api_v1", &upstreams.api_v1)?,
            jobs: proxy("jobs", &upstreams.jobs)?,
            trpc: proxy("trpc", &upstreams.trpc)?,
            openapi: Arc::new(OpenApiDocument::from_settings(&settings)?),
            beta_trpc: proxy("beta_trpc", &upstreams.trpc)?,
        };
        let mounts = MountTable::standard(&settings.api.beta_url, groups);

        Ok(Self {
            sessions: Arc::new(HttpSessionProvider::new(client.clone(), &upstreams.auth)),
            site_settings: Arc::new(HttpSiteSettingsProvider::new(
                client.clone(),
                &upstreams.site_settings,
            )),
            limits: Arc::new(HttpLimitsProvider::new(client.clone(), &upstreams.limits)),
            profiles: Arc::new(HttpProfileDirectory::new(client, &upstreams.profiles)),
            mounts: Arc::new(mounts),
            settings: Arc::new(settings),
        })
    }
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        health::init_server_start();

        let cors_layer = cors::create_cors_layer(&settings.cors);
        let addr: SocketAddr = settings
            .server_addr()
            .parse()
            .with_context(|| format!("Invalid server address {}", settings.server_addr()))?;

        let state = AppState::from_settings(settings)?;
        for entry in state.mounts.entries() {
            tracing::info!(group = entry.name(), pattern = %entry.pattern(), "Mounted");
        }

        // Build router with middleware
        let router = routes::create_router(state)
            .layer(logging::create_trace_layer())
            .layer(cors_layer);

        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
