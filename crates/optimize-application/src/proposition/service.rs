//! Proposition orchestration service.

use std::collections::HashMap;
use std::sync::Arc;

use optimize_core::decisioning::DecisioningError;
use optimize_core::error::{OptimizeError, Result};
use optimize_core::proposition::{
    DecisionScope, InteractionReporter, Offer, PersonalizationChannel, PersonalizationRequest,
    PersonalizationResponse, Proposition,
};
use serde_json::{Map, Value};
use tokio::sync::{Mutex, mpsc, oneshot};
use uuid::Uuid;

use super::store::PropositionStore;

/// Callback resolved when a personalization request completes.
pub type PropositionCallback =
    oneshot::Sender<std::result::Result<Vec<Proposition>, DecisioningError>>;

/// Coordinates the proposition cache, the messaging channel, and the
/// reporting collaborator.
///
/// `PropositionService` is responsible for:
/// - Submitting update requests through the channel (fire-and-forget)
/// - Serving cached reads to the host UI layer
/// - Routing responses into the store and to pending callbacks
/// - Forwarding offer interactions to the reporter
pub struct PropositionService {
    /// Proposition cache read by the host UI layer.
    store: Arc<PropositionStore>,
    /// Outbound channel toward the decisioning service.
    channel: Arc<dyn PersonalizationChannel>,
    /// Collaborator receiving display/tap notifications.
    reporter: Arc<dyn InteractionReporter>,
    /// Callbacks awaiting a response, keyed by request id.
    pending: Mutex<HashMap<Uuid, PropositionCallback>>,
}

impl PropositionService {
    /// Creates a service over the given collaborators.
    pub fn new(
        store: Arc<PropositionStore>,
        channel: Arc<dyn PersonalizationChannel>,
        reporter: Arc<dyn InteractionReporter>,
    ) -> Self {
        Self {
            store,
            channel,
            reporter,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the underlying store, for direct snapshot reads.
    pub fn store(&self) -> Arc<PropositionStore> {
        self.store.clone()
    }

    /// Requests fresh propositions for the given scopes, fire-and-forget.
    ///
    /// The call returns once the request is enqueued; the store is
    /// populated when the response arrives on the response path. On
    /// failure the store is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizeError::InvalidScope`] if no scopes are given or a
    /// scope fails validation, or the channel's error if submission fails.
    pub async fn update_propositions(
        &self,
        scopes: Vec<DecisionScope>,
        xdm: Map<String, Value>,
        data: Map<String, Value>,
    ) -> Result<()> {
        self.submit_update(scopes, xdm, data, None).await
    }

    /// Requests fresh propositions and registers a callback resolved with
    /// the outcome: the resolved propositions, or the classified error.
    ///
    /// The callback fires exactly once per request. Responses for
    /// independent requests may resolve in any order.
    ///
    /// # Errors
    ///
    /// Same conditions as [`update_propositions`](Self::update_propositions);
    /// if submission fails the callback is dropped unresolved.
    pub async fn update_propositions_with(
        &self,
        scopes: Vec<DecisionScope>,
        xdm: Map<String, Value>,
        data: Map<String, Value>,
        callback: PropositionCallback,
    ) -> Result<()> {
        self.submit_update(scopes, xdm, data, Some(callback)).await
    }

    async fn submit_update(
        &self,
        scopes: Vec<DecisionScope>,
        xdm: Map<String, Value>,
        data: Map<String, Value>,
        callback: Option<PropositionCallback>,
    ) -> Result<()> {
        if scopes.is_empty() {
            return Err(OptimizeError::invalid_scope("no decision scopes provided"));
        }
        if let Some(invalid) = scopes.iter().find(|scope| !scope.is_valid()) {
            return Err(OptimizeError::invalid_scope(invalid.name.clone()));
        }

        let request = PersonalizationRequest::new(scopes, xdm, data);
        let request_id = request.request_id;

        if let Some(callback) = callback {
            self.pending.lock().await.insert(request_id, callback);
        }

        tracing::debug!(
            %request_id,
            scopes = request.scopes.len(),
            "submitting personalization request"
        );

        if let Err(error) = self.channel.submit(request).await {
            // A request that never left must not leave a dangling callback.
            self.pending.lock().await.remove(&request_id);
            return Err(error);
        }

        Ok(())
    }

    /// Returns the cached propositions for the given scopes.
    ///
    /// Scopes that were never fetched (or were cleared) are simply absent
    /// from the result; no request is submitted.
    pub async fn get_propositions(&self, scopes: &[DecisionScope]) -> Vec<Proposition> {
        let mut propositions = Vec::new();
        for scope in scopes {
            if let Some(proposition) = self.store.get(&scope.name).await {
                propositions.push(proposition);
            }
        }
        propositions
    }

    /// Removes all cached propositions.
    pub async fn clear_propositions(&self) {
        self.store.clear().await;
        tracing::debug!("cleared cached propositions");
    }

    /// Returns all cached entries ordered by ascending scope name.
    pub async fn snapshot(&self) -> Vec<(String, Proposition)> {
        self.store.snapshot().await
    }

    /// Routes one response from the decisioning service.
    ///
    /// Successful responses upsert every proposition into the store before
    /// resolving the pending callback, so a callback observer always sees
    /// the cache already updated. Failures resolve the callback with the
    /// classified error and leave the store untouched.
    pub async fn handle_response(&self, response: PersonalizationResponse) {
        match response {
            PersonalizationResponse::Propositions {
                request_id,
                propositions,
            } => {
                for proposition in &propositions {
                    self.store.upsert(proposition.clone()).await;
                }
                tracing::debug!(
                    %request_id,
                    count = propositions.len(),
                    "propositions cached"
                );
                if let Some(callback) = self.pending.lock().await.remove(&request_id) {
                    let _ = callback.send(Ok(propositions));
                }
            }
            PersonalizationResponse::Failure {
                request_id,
                payload,
            } => {
                let error = DecisioningError::from_payload(payload);
                tracing::warn!(
                    %request_id,
                    kind = %error.kind,
                    status = ?error.status,
                    "personalization request failed"
                );
                if let Some(callback) = self.pending.lock().await.remove(&request_id) {
                    let _ = callback.send(Err(error));
                }
            }
        }
    }

    /// Drains a response stream, routing each response until the sender
    /// side closes. Intended to be spawned next to the channel that
    /// delivers responses.
    pub async fn run_response_loop(
        self: Arc<Self>,
        mut receiver: mpsc::Receiver<PersonalizationResponse>,
    ) {
        while let Some(response) = receiver.recv().await {
            self.handle_response(response).await;
        }
        tracing::debug!("personalization response stream closed");
    }

    /// Forwards a display notification for an offer.
    ///
    /// The offer's scope back-reference resolves the reporting scope. No
    /// store mutation; at-most-once-per-visibility-transition is the host
    /// UI layer's contract.
    pub async fn offer_displayed(&self, offer: &Offer) {
        self.reporter.report_displayed(&offer.scope_name, offer).await;
    }

    /// Forwards a tap notification for an offer.
    pub async fn offer_tapped(&self, offer: &Offer) {
        self.reporter.report_tapped(&offer.scope_name, offer).await;
    }
}

#[cfg(test)]
#[path = "service_test.rs"]
mod tests;
