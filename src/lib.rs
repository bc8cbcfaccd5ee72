//! # Docsign Web
//!
//! HTTP gateway for the document-signing web application. It owns no
//! business logic of its own; it composes independently owned services:
//!
//! - attaches a per-request context (the caller's session),
//! - applies initial page-load behaviour (canonical paths, auth redirects),
//! - dispatches API prefixes to their owning services through an ordered,
//!   first-match-wins mount table,
//! - loads the view models of the authenticated and public-profile layouts.
//!
//! With the `testing` feature, a `testing` module drives the real
//! sign-in/sign-out handshake for end-to-end tests.
//!
//! ## Module Structure
//!
//! ```text
//! docsign_web/
//! +-- config/         Configuration management
//! +-- domain/         Read models and provider traits
//! +-- infrastructure/ Upstream HTTP clients and metrics
//! +-- presentation/   Routes, middleware, mount table, page layouts
//! +-- shared/         Errors
//! +-- testing/        End-to-end authentication fixture (feature `testing`)
//! ```

// Configuration module
pub mod config;

// Domain layer - Read models and provider contracts
pub mod domain;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP routing and layouts
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;

// End-to-end test fixtures
#[cfg(feature = "testing")]
pub mod testing;
