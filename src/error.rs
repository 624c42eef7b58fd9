//! Error types for the mediatrust engine
//!
//! This module provides structured error handling using thiserror for
//! typed error definitions and anyhow for error propagation at the edges.
//!
//! The taxonomy follows the engine's failure model: missing entities are
//! typed misses (they never abort batch operations), upstream scrape
//! failures are recovered locally by the caller, and invariant violations
//! fail closed.

use thiserror::Error;

/// Main error type for mediatrust operations
#[derive(Error, Debug)]
pub enum TrustError {
    /// Mediator record absent from the evidence store
    #[error("Mediator not found: {0}")]
    MediatorNotFound(String),

    /// Model version absent from the registry
    #[error("Model version not found: {model_type}/{version}")]
    VersionNotFound { model_type: String, version: String },

    /// Illegal state transition or concurrent-activation conflict
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Structurally invalid input (e.g. empty mediator id)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Duplicate version string for a model type
    #[error("Resource already exists: {0}")]
    AlreadyExists(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Invalid id format
    #[error("Invalid id: {0}")]
    InvalidId(#[from] uuid::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for mediatrust operations
pub type Result<T> = std::result::Result<T, TrustError>;

/// Convert anyhow::Error to TrustError
impl From<anyhow::Error> for TrustError {
    fn from(err: anyhow::Error) -> Self {
        TrustError::Other(err.to_string())
    }
}
