//! Error handling module for mediaprep

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Top-level error for setup and preflight failures
#[derive(Error, Debug)]
pub enum MediaPrepError {
    /// Config file could not be read or parsed
    #[error("Invalid configuration in {path}: {message}")]
    ConfigError { path: String, message: String },

    /// Config file has an extension we cannot parse
    #[error("Unsupported config format: {path} (expected .toml, .yaml or .yml)")]
    UnsupportedConfigFormat { path: String },

    /// Logging could not be initialized
    #[error("Failed to initialize logging: {message}")]
    LoggingInit { message: String },

    /// Error bubbled up from the domain layer
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for mediaprep setup operations
pub type MediaPrepResult<T> = std::result::Result<T, MediaPrepError>;
