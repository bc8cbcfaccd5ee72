//! Middleware
//!
//! Tower middleware for request processing.

pub mod app;
pub mod context;
pub mod cors;
pub mod logging;

pub use app::app_middleware;
pub use context::{attach_context, RequestContext};
