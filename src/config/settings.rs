//! Application settings and configuration structures.

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use reqwest::Url;
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// Public web application settings
    pub webapp: WebAppSettings,

    /// Public API settings (beta prefix, OpenAPI document)
    pub api: ApiSettings,

    /// Base URLs of the sub-services mounted by the gateway
    pub upstreams: UpstreamSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// Public web application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebAppSettings {
    /// Absolute base URL the application is reachable at
    pub public_url: String,

    /// Page unauthenticated visitors are sent to
    pub signin_path: String,

    /// Page a freshly signed-in user lands on
    pub post_login_path: String,
}

/// Public API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    /// Path prefix of the unstable (beta) API
    pub beta_url: String,

    /// Title reported by the generated OpenAPI document
    pub openapi_title: String,

    /// Optional path to a pre-built OpenAPI JSON document
    pub openapi_document: Option<String>,
}

/// Sub-service base URLs.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamSettings {
    /// Authentication service (also answers session lookups)
    pub auth: String,

    /// File transfer service
    pub files: String,

    /// Versioned REST-style API
    pub api_v1: String,

    /// Background job callback intake
    pub jobs: String,

    /// RPC-over-HTTP bridge (also serves the beta bridge)
    pub trpc: String,

    /// Site settings service (banner)
    pub site_settings: String,

    /// Usage limits service
    pub limits: String,

    /// Public profile directory
    pub profiles: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins (comma-separated in env)
    pub allowed_origins: Vec<String>,
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. Built-in defaults
    /// 2. config/default.toml (base configuration)
    /// 3. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 4. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if the public URL or beta prefix is malformed.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        with_defaults(Config::builder(), &environment)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // APP__SERVER__PORT=3000 -> server.port = 3000
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("webapp.public_url", std::env::var("WEBAPP_URL").ok())?
            .build()?
            .try_deserialize()
            .and_then(Self::validate)
    }

    /// Settings built from the built-in defaults only.
    pub fn defaults() -> Result<Self, ConfigError> {
        with_defaults(Config::builder(), "development")?
            .build()?
            .try_deserialize()
            .and_then(Self::validate)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        let url = Url::parse(&self.webapp.public_url).map_err(|e| {
            ConfigError::Message(format!(
                "webapp.public_url must be an absolute URL ({}): {}",
                self.webapp.public_url, e
            ))
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::Message(format!(
                "webapp.public_url cannot be used as a base URL: {}",
                self.webapp.public_url
            )));
        }

        if !self.api.beta_url.starts_with('/') || self.api.beta_url.len() < 2 {
            return Err(ConfigError::Message(format!(
                "api.beta_url must be a non-root path starting with '/': {}",
                self.api.beta_url
            )));
        }

        Ok(self)
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl WebAppSettings {
    /// Absolute URL for a path on the public web application.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.public_url.trim_end_matches('/'), path)
    }
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
    environment: &str,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("environment", environment)?
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("webapp.public_url", "http://localhost:3000")?
        .set_default("webapp.signin_path", "/signin")?
        .set_default("webapp.post_login_path", "/documents")?
        .set_default("api.beta_url", "/api/v2-beta")?
        .set_default("api.openapi_title", "Document Signing API")?
        .set_default("upstreams.auth", "http://localhost:3010")?
        .set_default("upstreams.files", "http://localhost:3011")?
        .set_default("upstreams.api_v1", "http://localhost:3012")?
        .set_default("upstreams.jobs", "http://localhost:3013")?
        .set_default("upstreams.trpc", "http://localhost:3014")?
        .set_default("upstreams.site_settings", "http://localhost:3015")?
        .set_default("upstreams.limits", "http://localhost:3016")?
        .set_default("upstreams.profiles", "http://localhost:3017")?
        .set_default("upstreams.timeout_secs", 30)?
        .set_default("cors.allowed_origins", vec!["http://localhost:3000"])
}
