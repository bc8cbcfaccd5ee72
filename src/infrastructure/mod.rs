//! Infrastructure Layer
//!
//! HTTP clients for the external services and metrics collection.

pub mod metrics;
pub mod upstream;
