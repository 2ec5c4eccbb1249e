//! HTTP request handlers for API endpoints.
//!
//! This module contains all the HTTP request handlers that process
//! incoming requests and generate responses.

pub mod control;
pub mod health;
pub mod logs;
pub mod openapi;

pub use control::*;
pub use health::*;
pub use logs::*;
pub use openapi::*;
