//! # Docsign Web
//!
//! Gateway entry point. Initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Upstream clients and the mount table
//! - HTTP server

use anyhow::Result;
use tracing::info;

use docsign_web::config::Settings;
use docsign_web::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    docsign_web::telemetry::init_tracing();

    info!("Starting gateway...");

    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        public_url = %settings.webapp.public_url,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
