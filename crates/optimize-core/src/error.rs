//! Error types for the Optimize core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decisioning::DecisioningError;

/// A shared error type for the Optimize crates.
///
/// This covers operational failures in the SDK itself (closed channels,
/// rejected input, serialization problems). Failures reported by the remote
/// decisioning service are carried as a classified [`DecisioningError`].
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum OptimizeError {
    /// A personalization request failed with a classified decisioning error
    #[error("decisioning request failed: {0}")]
    Decisioning(DecisioningError),

    /// The messaging channel toward the decisioning service is closed
    #[error("personalization channel closed")]
    ChannelClosed,

    /// A decision scope failed validation before submission
    #[error("invalid decision scope: {0}")]
    InvalidScope(String),

    /// Serialization/deserialization error
    #[error("serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", "base64", etc.
        message: String,
    },

    /// Internal error (should not happen in normal operation)
    #[error("internal error: {0}")]
    Internal(String),
}

impl OptimizeError {
    /// Creates an InvalidScope error
    pub fn invalid_scope(message: impl Into<String>) -> Self {
        Self::InvalidScope(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a ChannelClosed error
    pub fn is_channel_closed(&self) -> bool {
        matches!(self, Self::ChannelClosed)
    }

    /// Check if this is an InvalidScope error
    pub fn is_invalid_scope(&self) -> bool {
        matches!(self, Self::InvalidScope(_))
    }

    /// Check if this error carries a classified decisioning failure
    pub fn is_decisioning(&self) -> bool {
        matches!(self, Self::Decisioning(_))
    }

    /// Returns the classified decisioning error, if that is what this is.
    pub fn as_decisioning(&self) -> Option<&DecisioningError> {
        match self {
            Self::Decisioning(error) => Some(error),
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<DecisioningError> for OptimizeError {
    fn from(error: DecisioningError) -> Self {
        Self::Decisioning(error)
    }
}

impl From<serde_json::Error> for OptimizeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error for collaborators that surface opaque errors
impl From<anyhow::Error> for OptimizeError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<String> for OptimizeError {
    fn from(err: String) -> Self {
        Self::Internal(err)
    }
}

/// A type alias for `Result<T, OptimizeError>`.
pub type Result<T> = std::result::Result<T, OptimizeError>;
