// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    BadArgs(String),
    /// File or directory not found
    FileNotFound(String),
    /// External tool not installed or not on PATH
    ToolMissing(String),
    /// External tool ran but reported failure
    ToolFailed(String),
    /// Media properties could not be read
    ProbeFailed(String),
    /// Image decode/encode error
    ImageFailed(String),
    /// File system operation failed
    FsFail(String),
    /// Configuration could not be loaded or is invalid
    ConfigFailed(String),
    /// Internal error
    InternalError(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::FileNotFound(msg) => write!(f, "File not found: {}", msg),
            DomainError::ToolMissing(msg) => write!(f, "Tool missing: {}", msg),
            DomainError::ToolFailed(msg) => write!(f, "Tool failed: {}", msg),
            DomainError::ProbeFailed(msg) => write!(f, "Probe failed: {}", msg),
            DomainError::ImageFailed(msg) => write!(f, "Image processing failed: {}", msg),
            DomainError::FsFail(msg) => write!(f, "File system error: {}", msg),
            DomainError::ConfigFailed(msg) => write!(f, "Configuration error: {}", msg),
            DomainError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::FsFail(err.to_string())
    }
}
