//! End-to-end Test Fixtures
//!
//! Helpers that drive a running web app the way a browser would.

pub mod authentication;

pub use authentication::{AuthFixture, BrowserPage, FixtureError, HttpPage, LoginOptions};
