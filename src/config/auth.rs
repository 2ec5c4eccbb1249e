//! API key signing configuration.

use std::env;

/// Configuration for API key verification and issuance
#[derive(Clone)]
pub struct AuthConfig {
    /// Shared HS256 secret
    pub secret: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: "default-secret-key".to_string(),
        }
    }
}

impl AuthConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let secret =
            env::var("API_KEY_SECRET").unwrap_or_else(|_| "default-secret-key".to_string());

        Self { secret }
    }
}
