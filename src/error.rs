//! Error types for yang-entity

use thiserror::Error;

/// Main error type for entity and codec operations
#[derive(Debug, Error)]
pub enum YangError {
    /// Malformed or empty argument passed to a public entry point
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A model constraint was violated (unknown field, wrong holder kind)
    #[error("Model error: {0}")]
    ModelConstraint(String),

    /// Payload could not be encoded or decoded
    #[error("Codec error: {0}")]
    Codec(String),

    /// A value satisfied none of the acceptable type descriptors
    #[error("Invalid value {value} for '{leaf}'. Expected types: {expected}")]
    TypeMismatch {
        leaf: String,
        value: String,
        expected: String,
    },

    /// IO error (namespace table files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl YangError {
    /// Build an `InvalidArgument` error, logging it first
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::error!("{}", msg);
        YangError::InvalidArgument(msg)
    }

    /// Build a `ModelConstraint` error, logging it first
    pub(crate) fn model(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::error!("{}", msg);
        YangError::ModelConstraint(msg)
    }

    /// Build a `Codec` error, logging it first
    pub(crate) fn codec(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::error!("{}", msg);
        YangError::Codec(msg)
    }
}

/// Result type alias for entity and codec operations
pub type Result<T> = std::result::Result<T, YangError>;
