//! Sign-in / sign-out fixture.
//!
//! Drives the authentication service's real handshake over HTTP: fetch a
//! CSRF token, post it with the credentials (or to the sign-out endpoint),
//! then navigate the page. POST responses are not inspected; whether the
//! navigation landed where the test expects is for the test to check.

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::config::Settings;

pub const DEFAULT_EMAIL: &str = "example@documenso.com";
pub const DEFAULT_PASSWORD: &str = "password";
pub const DEFAULT_REDIRECT_PATH: &str = "/documents";

/// Fixture errors
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("Invalid session")]
    InvalidSession,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// The page a test drives. Its request context shares cookies with the
/// page, so a sign-in through [`BrowserPage::request`] signs the page in.
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// API client sharing the page's cookies.
    fn request(&self) -> &Client;

    /// Load `url` in the page.
    async fn goto(&self, url: &str) -> Result<(), FixtureError>;

    /// Where the page currently is.
    fn url(&self) -> Option<String>;
}

/// Headless page backed by a cookie-enabled HTTP client. Navigation follows
/// redirects like a browser would.
pub struct HttpPage {
    client: Client,
    current: Mutex<Option<Url>>,
}

impl HttpPage {
    pub fn new() -> Result<Self, FixtureError> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            current: Mutex::new(None),
        }
    }
}

#[async_trait]
impl BrowserPage for HttpPage {
    fn request(&self) -> &Client {
        &self.client
    }

    async fn goto(&self, url: &str) -> Result<(), FixtureError> {
        let response = self.client.get(url).send().await?;
        tracing::debug!(%url, landed = %response.url(), status = %response.status(), "Page navigated");
        *self.current.lock() = Some(response.url().clone());
        Ok(())
    }

    fn url(&self) -> Option<String> {
        self.current.lock().as_ref().map(Url::to_string)
    }
}

/// Credentials and landing page for [`AuthFixture::sign_in`].
#[derive(Debug, Clone)]
pub struct LoginOptions {
    pub email: String,
    pub password: String,
    /// Where to navigate after login.
    pub redirect_path: String,
}

impl Default for LoginOptions {
    fn default() -> Self {
        Self {
            email: DEFAULT_EMAIL.into(),
            password: DEFAULT_PASSWORD.into(),
            redirect_path: DEFAULT_REDIRECT_PATH.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CsrfResponse {
    #[serde(rename = "csrfToken", default)]
    csrf_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsForm<'a> {
    email: &'a str,
    password: &'a str,
    json: bool,
    csrf_token: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignoutForm<'a> {
    csrf_token: &'a str,
    json: bool,
}

/// Authentication handshake against the web app at `base_url`.
#[derive(Debug, Clone)]
pub struct AuthFixture {
    base_url: String,
}

impl AuthFixture {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Fixture pointed at the configured public web app URL.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.webapp.public_url.clone())
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sign in with `options`, then open `options.redirect_path`.
    pub async fn sign_in(
        &self,
        page: &dyn BrowserPage,
        options: &LoginOptions,
    ) -> Result<(), FixtureError> {
        let csrf_token = self.csrf_token(page).await?;

        page.request()
            .post(self.url_for("/api/auth/callback/credentials"))
            .form(&CredentialsForm {
                email: &options.email,
                password: &options.password,
                json: true,
                csrf_token: &csrf_token,
            })
            .send()
            .await?;

        page.goto(&self.url_for(&options.redirect_path)).await
    }

    /// Sign out, then open the sign-in page.
    pub async fn sign_out(&self, page: &dyn BrowserPage) -> Result<(), FixtureError> {
        let csrf_token = self.csrf_token(page).await?;

        page.request()
            .post(self.url_for("/api/auth/signout"))
            .form(&SignoutForm {
                csrf_token: &csrf_token,
                json: true,
            })
            .send()
            .await?;

        page.goto(&self.url_for("/signin")).await
    }

    async fn csrf_token(&self, page: &dyn BrowserPage) -> Result<String, FixtureError> {
        let response: CsrfResponse = page
            .request()
            .get(self.url_for("/api/auth/csrf"))
            .send()
            .await?
            .json()
            .await?;

        match response.csrf_token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(FixtureError::InvalidSession),
        }
    }
}
