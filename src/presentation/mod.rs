//! Presentation Layer
//!
//! HTTP routing, middleware and page layouts.

pub mod http;
pub mod middleware;
pub mod pages;
