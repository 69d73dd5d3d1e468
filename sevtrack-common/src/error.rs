//! Common error types for sevtrack

use thiserror::Error;

/// Common result type for sevtrack operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across sevtrack services
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed TOML configuration file
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
}
