// ABOUTME: Configuration loading for the micropaste server.
// ABOUTME: Reads environment variables with defaults for bind address and database path.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MICROPASTE_BIND is not a valid socket address: {0}")]
    InvalidBind(String),
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct MicropasteConfig {
    pub bind: SocketAddr,
    pub db_path: PathBuf,
}

impl MicropasteConfig {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Environment variables:
    /// - MICROPASTE_BIND: socket address to bind (default: 127.0.0.1:8080)
    /// - MICROPASTE_DB: SQLite database path (default: ~/.micropaste/entries.db)
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_str =
            std::env::var("MICROPASTE_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let bind: SocketAddr = bind_str
            .parse()
            .map_err(|_| ConfigError::InvalidBind(bind_str))?;

        let db_path = std::env::var("MICROPASTE_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                std::env::var("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("/tmp"))
                    .join(".micropaste")
                    .join("entries.db")
            });

        Ok(Self { bind, db_path })
    }
}
