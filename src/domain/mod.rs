//! # Domain Layer
//!
//! Read models the gateway consumes: sessions, site settings, usage limits
//! and public profiles. None of them are owned here; each comes with a
//! provider trait that the infrastructure layer implements over HTTP.
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Provider traits define the call contracts of external services
//! - Entities are plain, serializable data

pub mod entities;

// Re-export commonly used types
pub use entities::*;
