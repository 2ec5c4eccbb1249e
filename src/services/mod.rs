//! Business logic: credential checking and the monthly analytics engine.

pub mod analytics;
pub mod auth;

pub use analytics::*;
pub use auth::*;
