//! Error types for the assistant

use thiserror::Error;

/// Assistant-wide error type
#[derive(Error, Debug)]
pub enum SdrError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error ({backend}): {message}")]
    Storage { backend: String, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SdrError {
    pub fn api(msg: impl Into<String>) -> Self {
        SdrError::Api(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        SdrError::Network(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        SdrError::Parse(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        SdrError::NotFound(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        SdrError::Config(msg.into())
    }

    pub fn storage(backend: impl Into<String>, message: impl Into<String>) -> Self {
        SdrError::Storage {
            backend: backend.into(),
            message: message.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        SdrError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        SdrError::Internal(msg.into())
    }
}

/// Result type alias for assistant operations
pub type SdrResult<T> = Result<T, SdrError>;
