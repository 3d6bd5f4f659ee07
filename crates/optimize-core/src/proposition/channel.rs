//! Outbound messaging channel trait.

use async_trait::async_trait;

use super::event::PersonalizationRequest;
use crate::error::Result;

/// An abstract channel toward the remote decisioning service.
///
/// This trait decouples the core from the transport: the SDK only ever
/// enqueues requests and consumes responses delivered elsewhere. The
/// channel is assumed reliable and asynchronous; retry policy, timeouts and
/// delivery ordering belong to the implementation behind it.
#[async_trait]
pub trait PersonalizationChannel: Send + Sync {
    /// Submits a personalization request.
    ///
    /// Returns once the request is enqueued, not when it resolves. The
    /// matching [`super::PersonalizationResponse`] arrives later on the
    /// response path, if at all.
    ///
    /// # Errors
    ///
    /// Returns [`crate::OptimizeError::ChannelClosed`] if the channel can no
    /// longer accept requests.
    async fn submit(&self, request: PersonalizationRequest) -> Result<()>;
}
