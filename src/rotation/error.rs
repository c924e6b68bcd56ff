//! Error types for the rotation module

use std::fmt;

use chrono::{DateTime, Utc};

/// Result type for rotation operations
pub type RotationResult<T> = Result<T, RotationError>;

/// Rotation-specific errors
///
/// Nothing in the scheduler swallows these; every failure propagates to
/// the immediate caller (trigger loop, CLI, or ops endpoint).
#[derive(Debug)]
pub enum RotationError {
    /// The post store could not be reached for a read
    StorageUnavailable {
        operation: String,
        reason: String,
        at: DateTime<Utc>,
    },

    /// The content creator could not produce or persist a post
    ///
    /// The chosen category was attempted but no record exists, so the
    /// next run recomputes from the same prior state.
    CreationFailed {
        category: String,
        reason: String,
    },

    /// Bulk delete of automation posts failed, partially or fully
    ClearFailed {
        /// Best-effort count of rows deleted before the failure
        deleted: u64,
        reason: String,
    },

    /// Trigger configuration error
    TriggerConfig {
        field: String,
        reason: String,
    },
}

impl fmt::Display for RotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StorageUnavailable { operation, reason, at } => {
                write!(f, "Post store unavailable during '{operation}' at {at}: {reason}")
            }
            Self::CreationFailed { category, reason } => {
                write!(f, "Failed to create post for category '{category}': {reason}")
            }
            Self::ClearFailed { deleted, reason } => {
                write!(f, "Failed to clear automation posts ({deleted} deleted): {reason}")
            }
            Self::TriggerConfig { field, reason } => {
                write!(f, "Trigger config error in '{field}': {reason}")
            }
        }
    }
}

impl std::error::Error for RotationError {}

impl RotationError {
    /// Create a storage unavailable error, stamped with the current time
    pub fn storage_unavailable(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            operation: operation.into(),
            reason: reason.into(),
            at: Utc::now(),
        }
    }

    /// Create a creation failed error
    pub fn creation_failed(category: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CreationFailed {
            category: category.into(),
            reason: reason.into(),
        }
    }

    /// Create a clear failed error with a best-effort deleted count
    pub fn clear_failed(deleted: u64, reason: impl Into<String>) -> Self {
        Self::ClearFailed {
            deleted,
            reason: reason.into(),
        }
    }

    /// Create a trigger config error
    pub fn trigger_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::TriggerConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Check if the error is recoverable (worth retrying on a later run)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::StorageUnavailable { .. } | Self::CreationFailed { .. } | Self::ClearFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_unavailable_display() {
        let err = RotationError::storage_unavailable("latest_automated", "connection refused");
        let msg = err.to_string();
        assert!(msg.contains("latest_automated"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_creation_failed_display() {
        let err = RotationError::creation_failed("solutions", "generation timed out");
        assert!(err.to_string().contains("solutions"));
    }

    #[test]
    fn test_clear_failed_carries_partial_count() {
        let err = RotationError::clear_failed(3, "disk full");
        match err {
            RotationError::ClearFailed { deleted, .. } => assert_eq!(deleted, 3),
            _ => panic!("unexpected variant"),
        }
    }

    #[test]
    fn test_is_recoverable() {
        assert!(RotationError::storage_unavailable("read", "timeout").is_recoverable());
        assert!(RotationError::creation_failed("industry", "oops").is_recoverable());
        assert!(!RotationError::trigger_config("post_time", "bad format").is_recoverable());
    }
}
