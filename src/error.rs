//! Unified error handling for the blogmill crate
//!
//! Domain-specific errors live with their modules (notably
//! [`RotationError`]); this module wraps them into a single `Error` enum
//! for use across module boundaries, with a coarse category accessor for
//! handling strategies.

use std::io;
use thiserror::Error;

pub use crate::rotation::error::RotationError;

/// Result type alias using the unified error
pub type Result<T> = std::result::Result<T, Error>;

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Storage and I/O errors
    Storage,
    /// Rotation and scheduling errors
    Rotation,
    /// Configuration and validation errors
    Config,
    /// Other/unknown errors
    Other,
}

/// Unified error type for the blogmill crate
#[derive(Error, Debug)]
pub enum Error {
    /// Rotation and trigger errors
    #[error("Rotation error: {0}")]
    Rotation(#[from] RotationError),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Get the error category for handling strategies
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Rotation(inner) => match inner {
                RotationError::TriggerConfig { .. } => ErrorCategory::Config,
                _ => ErrorCategory::Rotation,
            },
            Self::Database(_) | Self::Io(_) => ErrorCategory::Storage,
            Self::Json(_) => ErrorCategory::Other,
            Self::Config(_) => ErrorCategory::Config,
        }
    }

    /// Check if this error is recoverable (worth retrying later)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Rotation(inner) => inner.is_recoverable(),
            Self::Database(_) | Self::Io(_) => true,
            Self::Json(_) | Self::Config(_) => false,
        }
    }
}
