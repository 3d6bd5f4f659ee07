//! In-memory proposition cache.

use std::collections::BTreeMap;
use std::sync::Arc;

use optimize_core::proposition::Proposition;
use tokio::sync::RwLock;

/// In-memory cache of the most recent proposition per decision scope.
///
/// Holds at most one proposition per scope name. Writes arrive from
/// completed response callbacks; the host UI layer reads concurrently via
/// [`get`](Self::get) and [`snapshot`](Self::snapshot). An ordered map is
/// used so snapshots come back sorted by scope name, which is the order
/// the UI renders sections in.
pub struct PropositionStore {
    /// Latest proposition per scope name, ordered by name.
    propositions: Arc<RwLock<BTreeMap<String, Proposition>>>,
}

impl PropositionStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            propositions: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Caches a proposition, replacing any existing entry for its scope.
    ///
    /// Last write wins unconditionally; there is no version check and no
    /// merge. Subsequent reads observe the new value immediately.
    pub async fn upsert(&self, proposition: Proposition) {
        let mut propositions = self.propositions.write().await;
        propositions.insert(proposition.scope.name.clone(), proposition);
    }

    /// Returns the current proposition for a scope name, if any.
    pub async fn get(&self, scope_name: &str) -> Option<Proposition> {
        let propositions = self.propositions.read().await;
        propositions.get(scope_name).cloned()
    }

    /// Removes the entry for one scope name.
    pub async fn remove(&self, scope_name: &str) {
        let mut propositions = self.propositions.write().await;
        propositions.remove(scope_name);
    }

    /// Removes all cached propositions.
    pub async fn clear(&self) {
        let mut propositions = self.propositions.write().await;
        propositions.clear();
    }

    /// Returns all entries ordered by ascending scope name.
    pub async fn snapshot(&self) -> Vec<(String, Proposition)> {
        let propositions = self.propositions.read().await;
        propositions
            .iter()
            .map(|(name, proposition)| (name.clone(), proposition.clone()))
            .collect()
    }

    /// Number of cached scopes.
    pub async fn len(&self) -> usize {
        self.propositions.read().await.len()
    }

    /// Whether the store holds no propositions.
    pub async fn is_empty(&self) -> bool {
        self.propositions.read().await.is_empty()
    }
}

impl Default for PropositionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use optimize_core::proposition::{DecisionScope, Offer, OfferType};

    fn proposition(scope: &str, offers: Vec<Offer>) -> Proposition {
        Proposition::new(DecisionScope::new(scope), offers)
    }

    #[tokio::test]
    async fn test_upsert_then_get() {
        let store = PropositionStore::new();
        let inserted = proposition(
            "mbox1",
            vec![Offer::new("offer-1", "Hello", OfferType::Text)],
        );

        store.upsert(inserted.clone()).await;

        let cached = store.get("mbox1").await.unwrap();
        assert_eq!(cached, inserted);
        assert_eq!(cached.offers[0].content, "Hello");
    }

    #[tokio::test]
    async fn test_upsert_replaces_never_merges() {
        let store = PropositionStore::new();
        store
            .upsert(proposition(
                "A",
                vec![Offer::new("old", "first", OfferType::Text)],
            ))
            .await;

        let replacement = proposition("A", vec![Offer::new("new", "second", OfferType::Html)]);
        store.upsert(replacement.clone()).await;

        let cached = store.get("A").await.unwrap();
        assert_eq!(cached.offers.len(), 1);
        assert_eq!(cached.offers[0].id, "new");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_snapshot_sorted_by_scope_name() {
        let store = PropositionStore::new();
        for scope in ["b", "a", "c"] {
            store.upsert(proposition(scope, Vec::new())).await;
        }

        let names: Vec<String> = store
            .snapshot()
            .await
            .into_iter()
            .map(|(name, _)| name)
            .collect();

        assert_eq!(names, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_clear_empties_store() {
        let store = PropositionStore::new();
        store
            .upsert(proposition(
                "mbox1",
                vec![Offer::new("offer-1", "Hello", OfferType::Text)],
            ))
            .await;
        assert!(store.get("mbox1").await.is_some());

        store.clear().await;

        assert!(store.snapshot().await.is_empty());
        assert!(store.get("mbox1").await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_remove_single_scope() {
        let store = PropositionStore::new();
        store.upsert(proposition("keep", Vec::new())).await;
        store.upsert(proposition("drop", Vec::new())).await;

        store.remove("drop").await;

        assert!(store.get("drop").await.is_none());
        assert!(store.get("keep").await.is_some());
    }

    #[tokio::test]
    async fn test_get_never_populated_scope() {
        let store = PropositionStore::new();
        assert!(store.get("missing").await.is_none());
    }
}
