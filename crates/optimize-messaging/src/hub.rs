//! In-process event channel.

use async_trait::async_trait;
use optimize_core::config::OptimizeConfig;
use optimize_core::decisioning::{DecisioningErrorKind, error_data};
use optimize_core::error::{OptimizeError, Result};
use optimize_core::proposition::{
    FailurePayload, PersonalizationChannel, PersonalizationRequest, PersonalizationResponse,
    Proposition,
};
use tokio::sync::mpsc;
use uuid::Uuid;

/// In-process personalization channel backed by a bounded mpsc queue.
///
/// The hub is the submit side; the receiver returned by
/// [`EventHub::channel`] is drained by whatever plays the decisioning
/// service (an edge bridge in production wiring, the test itself in
/// integration tests).
pub struct EventHub {
    sender: mpsc::Sender<PersonalizationRequest>,
}

impl EventHub {
    /// Creates a hub together with the request receiver for the consuming
    /// side.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<PersonalizationRequest>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }

    /// Creates a hub sized from configuration.
    pub fn from_config(config: &OptimizeConfig) -> (Self, mpsc::Receiver<PersonalizationRequest>) {
        Self::channel(config.channel_capacity)
    }
}

#[async_trait]
impl PersonalizationChannel for EventHub {
    async fn submit(&self, request: PersonalizationRequest) -> Result<()> {
        tracing::debug!(request_id = %request.request_id, "enqueuing personalization request");
        self.sender
            .send(request)
            .await
            .map_err(|_| OptimizeError::ChannelClosed)
    }
}

/// Handle for pushing responses into a service's response loop.
pub struct Responder {
    sender: mpsc::Sender<PersonalizationResponse>,
}

impl Responder {
    /// Creates a responder together with the response receiver a service's
    /// response loop drains.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<PersonalizationResponse>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }

    /// Delivers a raw response.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizeError::ChannelClosed`] if the response loop is gone.
    pub async fn respond(&self, response: PersonalizationResponse) -> Result<()> {
        self.sender
            .send(response)
            .await
            .map_err(|_| OptimizeError::ChannelClosed)
    }

    /// Delivers resolved propositions for a request.
    pub async fn propositions(
        &self,
        request_id: Uuid,
        propositions: Vec<Proposition>,
    ) -> Result<()> {
        self.respond(PersonalizationResponse::Propositions {
            request_id,
            propositions,
        })
        .await
    }

    /// Delivers a failure payload for a request.
    pub async fn fail(&self, request_id: Uuid, payload: FailurePayload) -> Result<()> {
        self.respond(PersonalizationResponse::Failure {
            request_id,
            payload,
        })
        .await
    }

    /// Reports a request that timed out before the service answered.
    ///
    /// The payload carries the fixed timeout status and text, pre-classified
    /// as a callback timeout so downstream classification keeps it verbatim.
    pub async fn fail_timeout(&self, request_id: Uuid) -> Result<()> {
        self.fail(
            request_id,
            FailurePayload {
                error_type: None,
                status: Some(error_data::timeout::STATUS),
                title: Some(error_data::timeout::TITLE.to_string()),
                detail: Some(error_data::timeout::DETAIL.to_string()),
                report: None,
                kind: Some(DecisioningErrorKind::CallbackTimeout),
            },
        )
        .await
    }
}
