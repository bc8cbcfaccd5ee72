//! Domain Entities
//!
//! Read models owned by external services together with the traits the
//! gateway uses to fetch them.

pub mod limits;
pub mod profile;
pub mod session;
pub mod site_settings;

pub use limits::*;
pub use profile::*;
pub use session::*;
pub use site_settings::*;
