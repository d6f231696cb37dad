//! Error types for FastKV
//!
//! Provides a unified error type for every store and for the workload driver.

use thiserror::Error;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Unified error type for FastKV operations
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Key not found")]
    NotFound,

    #[error("Operation unsupported by {0} store")]
    Unsupported(&'static str),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Workload Errors
    // -------------------------------------------------------------------------
    #[error("Workload aborted: {0}")]
    Workload(String),
}

impl KvError {
    /// True for the `NotFound` variant
    pub fn is_not_found(&self) -> bool {
        matches!(self, KvError::NotFound)
    }

    /// True for the `Unsupported` variant
    pub fn is_unsupported(&self) -> bool {
        matches!(self, KvError::Unsupported(_))
    }
}
