//! Classified decisioning errors.
//!
//! A failed personalization request resolves to exactly one
//! [`DecisioningError`]: an immutable value carrying whatever the remote
//! service reported (type, status, title, detail, diagnostic report) plus a
//! guaranteed [`DecisioningErrorKind`]. The kind is either supplied by the
//! caller for conditions detected locally (a channel timeout, for example)
//! or derived from the HTTP-like status code.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumString};

use crate::proposition::FailurePayload;

/// Fixed status and message text for the pre-built error values.
pub mod error_data {
    /// Timeout failure reported by the messaging channel.
    pub mod timeout {
        pub const STATUS: u16 = 408;
        pub const TITLE: &str = "Request Timeout";
        pub const DETAIL: &str = "The personalization request timed out before a response arrived";
    }

    /// Fallback for any other failure.
    pub mod unexpected {
        pub const TITLE: &str = "Unexpected Error";
        pub const DETAIL: &str = "An unexpected error occurred while fetching propositions";
    }
}

/// Closed set of decisioning failure kinds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DecisioningErrorKind {
    /// The messaging channel reported no response within its own deadline.
    CallbackTimeout,
    /// Any other failure reported by the decisioning service.
    UnexpectedError,
}

impl DecisioningErrorKind {
    /// Classifies an HTTP-like status code, first match wins.
    ///
    /// The non-408 groups are kept as separate arms although they currently
    /// resolve to the same kind; the grouping is part of the observed
    /// contract with the decisioning service.
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            Some(408) => Self::CallbackTimeout,
            Some(400 | 403 | 404) => Self::UnexpectedError,
            Some(429 | 500 | 503) => Self::UnexpectedError,
            Some(502 | 504) => Self::UnexpectedError,
            _ => Self::UnexpectedError,
        }
    }
}

/// A normalized decisioning failure.
///
/// Created once per failed request and never mutated afterwards. The host
/// UI layer may surface `title`/`detail` to the user; cached propositions
/// are left untouched when one of these is produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisioningError {
    /// Failure type reported by the service, if any.
    pub error_type: Option<String>,
    /// HTTP-like status code, if one was reported.
    pub status: Option<u16>,
    /// Short human-readable summary.
    pub title: Option<String>,
    /// Longer human-readable description.
    pub detail: Option<String>,
    /// Diagnostic key/value pairs reported alongside the failure.
    pub report: Option<HashMap<String, Value>>,
    /// Resolved failure kind, always present.
    pub kind: DecisioningErrorKind,
}

impl DecisioningError {
    /// Builds a classified error.
    ///
    /// When `kind` is `Some` it is used verbatim, skipping status-code
    /// inspection; this is how an already-known condition such as a local
    /// timeout keeps its classification. When `None`, the kind is derived
    /// from `status` via [`DecisioningErrorKind::from_status`].
    pub fn new(
        error_type: Option<String>,
        status: Option<u16>,
        title: Option<String>,
        detail: Option<String>,
        report: Option<HashMap<String, Value>>,
        kind: Option<DecisioningErrorKind>,
    ) -> Self {
        let kind = kind.unwrap_or_else(|| DecisioningErrorKind::from_status(status));
        Self {
            error_type,
            status,
            title,
            detail,
            report,
            kind,
        }
    }

    /// Builds a classified error from a raw failure payload received off
    /// the messaging channel.
    pub fn from_payload(payload: FailurePayload) -> Self {
        Self::new(
            payload.error_type,
            payload.status,
            payload.title,
            payload.detail,
            payload.report,
            payload.kind,
        )
    }

    /// Check if this failure was classified as a callback timeout
    pub fn is_timeout(&self) -> bool {
        self.kind == DecisioningErrorKind::CallbackTimeout
    }
}

impl fmt::Display for DecisioningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.status, self.title.as_deref()) {
            (Some(status), Some(title)) => write!(f, "{} (status {status}): {title}", self.kind),
            (Some(status), None) => write!(f, "{} (status {status})", self.kind),
            (None, Some(title)) => write!(f, "{}: {title}", self.kind),
            (None, None) => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for DecisioningError {}

/// Pre-built timeout error, shared process-wide.
pub static TIMEOUT_ERROR: Lazy<DecisioningError> = Lazy::new(|| {
    DecisioningError::new(
        None,
        Some(error_data::timeout::STATUS),
        Some(error_data::timeout::TITLE.to_string()),
        Some(error_data::timeout::DETAIL.to_string()),
        None,
        Some(DecisioningErrorKind::CallbackTimeout),
    )
});

/// Pre-built fallback error, shared process-wide.
pub static UNEXPECTED_ERROR: Lazy<DecisioningError> = Lazy::new(|| {
    DecisioningError::new(
        None,
        None,
        Some(error_data::unexpected::TITLE.to_string()),
        Some(error_data::unexpected::DETAIL.to_string()),
        None,
        Some(DecisioningErrorKind::UnexpectedError),
    )
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_timeout_status() {
        assert_eq!(
            DecisioningErrorKind::from_status(Some(408)),
            DecisioningErrorKind::CallbackTimeout
        );
    }

    #[test]
    fn test_classify_other_statuses() {
        for status in [400, 403, 404, 429, 500, 502, 503, 504, 418, 599] {
            assert_eq!(
                DecisioningErrorKind::from_status(Some(status)),
                DecisioningErrorKind::UnexpectedError,
                "status {status} should classify as unexpected",
            );
        }
    }

    #[test]
    fn test_classify_absent_status() {
        assert_eq!(
            DecisioningErrorKind::from_status(None),
            DecisioningErrorKind::UnexpectedError
        );
    }

    #[test]
    fn test_explicit_kind_wins_over_status() {
        // A status that would classify as unexpected keeps the caller's kind.
        let error = DecisioningError::new(
            None,
            Some(500),
            None,
            None,
            None,
            Some(DecisioningErrorKind::CallbackTimeout),
        );

        assert_eq!(error.kind, DecisioningErrorKind::CallbackTimeout);
        assert!(error.is_timeout());
    }

    #[test]
    fn test_from_payload_classifies_by_status() {
        let payload = FailurePayload {
            error_type: Some("https://ns.example.com/errors/server".to_string()),
            status: Some(503),
            title: Some("Service Unavailable".to_string()),
            detail: None,
            report: None,
            kind: None,
        };

        let error = DecisioningError::from_payload(payload);

        assert_eq!(error.kind, DecisioningErrorKind::UnexpectedError);
        assert_eq!(error.status, Some(503));
        assert_eq!(error.title.as_deref(), Some("Service Unavailable"));
    }

    #[test]
    fn test_singleton_constants() {
        assert_eq!(TIMEOUT_ERROR.status, Some(408));
        assert_eq!(TIMEOUT_ERROR.kind, DecisioningErrorKind::CallbackTimeout);
        assert_eq!(TIMEOUT_ERROR.title.as_deref(), Some(error_data::timeout::TITLE));

        assert_eq!(UNEXPECTED_ERROR.status, None);
        assert_eq!(UNEXPECTED_ERROR.kind, DecisioningErrorKind::UnexpectedError);
    }

    #[test]
    fn test_display_includes_status_and_title() {
        let error = DecisioningError::new(
            None,
            Some(500),
            Some("Server Error".to_string()),
            None,
            None,
            None,
        );

        assert_eq!(error.to_string(), "unexpected_error (status 500): Server Error");
    }
}
