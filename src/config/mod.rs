//! Configuration structures and loading utilities.
//!
//! All configuration is read from the environment exactly once, in `main`,
//! and handed to the components that need it. Nothing else in the process
//! reads environment state.

pub mod auth;
pub mod server;

pub use auth::*;
pub use server::*;
