//! Data models and schemas for the Tracer API.
//!
//! This module contains all the data structures used throughout the application,
//! including persisted records, request/response models, and analytics shapes.

pub mod analytics;
pub mod api;
pub mod control;
pub mod log;

pub use analytics::*;
pub use api::*;
pub use control::*;
pub use log::*;
