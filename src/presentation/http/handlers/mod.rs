//! HTTP Handlers
//!
//! Operational endpoints owned by the gateway itself.

pub mod health;
