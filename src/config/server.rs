//! Server and storage location configuration.

use std::env;
use std::path::PathBuf;

/// Configuration for the HTTP listener and the database location
#[derive(Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub database_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            database_path: PathBuf::from("tracer.db"),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8080);

        let database_path = env::var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("tracer.db"));

        Self {
            bind_addr: format!("{host}:{port}"),
            database_path,
        }
    }
}
