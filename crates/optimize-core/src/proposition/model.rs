//! Proposition domain models.
//!
//! This module contains the entities resolved by a personalization request:
//! the decision scope identifying a content placement, the offers returned
//! for it, and the proposition grouping them.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// Identifies a content placement for which personalized offers are
/// requested.
///
/// The name is the unique key for the scope: either a plain placement name
/// or, for activity-based scopes, a base64-encoded JSON body carrying the
/// activity and placement identifiers the decisioning service expects.
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecisionScope {
    /// Unique scope name.
    pub name: String,
}

impl DecisionScope {
    /// Creates a scope from a plain placement name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Creates a scope from decisioning-activity coordinates, requesting a
    /// single item.
    pub fn from_activity(activity_id: &str, placement_id: &str) -> Self {
        Self::from_activity_with_count(activity_id, placement_id, 1)
    }

    /// Creates a scope from decisioning-activity coordinates.
    ///
    /// The scope name is the base64 encoding of
    /// `{"activityId":..,"placementId":..,"itemCount":..}`, the wire form
    /// the decisioning service uses for activity-based scopes.
    pub fn from_activity_with_count(
        activity_id: &str,
        placement_id: &str,
        item_count: u32,
    ) -> Self {
        let body = serde_json::json!({
            "activityId": activity_id,
            "placementId": placement_id,
            "itemCount": item_count,
        });
        Self {
            name: BASE64.encode(body.to_string()),
        }
    }

    /// Validates the scope name.
    ///
    /// Plain names only need to be non-empty. A name that decodes to a JSON
    /// body must carry non-empty `activityId` and `placementId` fields.
    pub fn is_valid(&self) -> bool {
        if self.name.is_empty() {
            return false;
        }

        if let Ok(decoded) = BASE64.decode(&self.name) {
            if let Ok(Value::Object(body)) = serde_json::from_slice::<Value>(&decoded) {
                let non_empty = |key: &str| {
                    body.get(key)
                        .and_then(Value::as_str)
                        .is_some_and(|value| !value.is_empty())
                };
                return non_empty("activityId") && non_empty("placementId");
            }
        }

        true
    }
}

/// Content type of an offer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OfferType {
    /// Plain text content.
    Text,
    /// An HTML fragment.
    Html,
    /// A JSON payload.
    Json,
    /// An image URL.
    Image,
}

/// A single piece of personalized content within a proposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    /// Offer identifier assigned by the decisioning service.
    pub id: String,
    /// Raw content payload, interpreted according to `offer_type`.
    pub content: String,
    /// Content type of the payload.
    pub offer_type: OfferType,
    /// Name of the owning proposition's scope.
    ///
    /// Relation only, never ownership: stamped by [`Proposition::new`] and
    /// used to resolve the scope when reporting display/tap interactions.
    #[serde(default)]
    pub scope_name: String,
}

impl Offer {
    /// Creates an offer that is not yet attached to a proposition.
    pub fn new(id: impl Into<String>, content: impl Into<String>, offer_type: OfferType) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            offer_type,
            scope_name: String::new(),
        }
    }
}

/// The resolved result for one decision scope.
///
/// Offer order is significant: it determines display order in the host UI.
/// A proposition replaces any prior proposition for the same scope when
/// cached; propositions are never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposition {
    /// Unique proposition identifier (UUID format).
    pub id: String,
    /// The scope this proposition resolves.
    pub scope: DecisionScope,
    /// Ordered offers for the scope.
    pub offers: Vec<Offer>,
}

impl Proposition {
    /// Builds a proposition, stamping each offer's scope back-reference.
    pub fn new(scope: DecisionScope, offers: Vec<Offer>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), scope, offers)
    }

    /// Builds a proposition with a service-assigned identifier.
    pub fn with_id(id: impl Into<String>, scope: DecisionScope, mut offers: Vec<Offer>) -> Self {
        for offer in &mut offers {
            offer.scope_name = scope.name.clone();
        }
        Self {
            id: id.into(),
            scope,
            offers,
        }
    }
}
