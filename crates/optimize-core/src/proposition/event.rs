//! Personalization event types.
//!
//! Requests flow out through the messaging channel; responses come back as
//! either resolved propositions or a raw failure payload awaiting
//! classification. Correlation is by request id, but responses may arrive
//! in any order and a late response for a superseded request still counts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::model::{DecisionScope, Proposition};
use crate::decisioning::DecisioningErrorKind;

/// A personalization request submitted to the decisioning service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalizationRequest {
    /// Correlation id echoed back by the response.
    pub request_id: Uuid,
    /// Decision scopes to fetch propositions for.
    pub scopes: Vec<DecisionScope>,
    /// Experience-event context merged into the personalization query.
    #[serde(default)]
    pub xdm: Map<String, Value>,
    /// Free-form data forwarded alongside the query.
    #[serde(default)]
    pub data: Map<String, Value>,
    /// Submission timestamp (RFC 3339 format).
    pub timestamp: String,
}

impl PersonalizationRequest {
    /// Creates a request with a fresh correlation id and timestamp.
    pub fn new(
        scopes: Vec<DecisionScope>,
        xdm: Map<String, Value>,
        data: Map<String, Value>,
    ) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            scopes,
            xdm,
            data,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Raw failure payload reported by the decisioning service or the channel.
///
/// This is the unclassified wire shape;
/// [`crate::decisioning::DecisioningError::from_payload`] normalizes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailurePayload {
    /// Failure type, if reported.
    #[serde(default)]
    pub error_type: Option<String>,
    /// HTTP-like status code, if reported.
    #[serde(default)]
    pub status: Option<u16>,
    /// Short human-readable summary.
    #[serde(default)]
    pub title: Option<String>,
    /// Longer human-readable description.
    #[serde(default)]
    pub detail: Option<String>,
    /// Diagnostic key/value pairs.
    #[serde(default)]
    pub report: Option<HashMap<String, Value>>,
    /// Pre-classified kind for conditions detected before any status code
    /// existed (e.g. a channel-side timeout); skips status inspection.
    #[serde(default)]
    pub kind: Option<DecisioningErrorKind>,
}

/// The resolution of a previously submitted personalization request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PersonalizationResponse {
    /// Propositions resolved for the request's scopes.
    Propositions {
        request_id: Uuid,
        propositions: Vec<Proposition>,
    },
    /// The request failed; the payload awaits classification.
    Failure {
        request_id: Uuid,
        payload: FailurePayload,
    },
}

impl PersonalizationResponse {
    /// Returns the correlation id of the originating request.
    pub fn request_id(&self) -> Uuid {
        match self {
            Self::Propositions { request_id, .. } | Self::Failure { request_id, .. } => *request_id,
        }
    }
}
