//! Interaction reporting trait.

use async_trait::async_trait;

use super::model::Offer;

/// Collaborator that receives offer-interaction notifications.
///
/// Notifications are fire-and-forget: no response is expected and failures
/// stay inside the implementation. The host UI layer is responsible for
/// calling in at most once per visibility transition (displayed) and at
/// most once per user interaction (tapped); the core forwards every call
/// it receives.
#[async_trait]
pub trait InteractionReporter: Send + Sync {
    /// Reports that an offer became visible.
    async fn report_displayed(&self, scope_name: &str, offer: &Offer);

    /// Reports that the user tapped an offer.
    async fn report_tapped(&self, scope_name: &str, offer: &Offer);
}
