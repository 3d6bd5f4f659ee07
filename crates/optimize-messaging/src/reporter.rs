//! Logging interaction reporter.

use async_trait::async_trait;
use optimize_core::proposition::{InteractionReporter, Offer};

/// Reporting collaborator that emits structured log events.
///
/// Useful as the default wiring when no analytics backend is attached:
/// interaction events become `tracing` records under the `interaction`
/// target instead of being dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

#[async_trait]
impl InteractionReporter for TracingReporter {
    async fn report_displayed(&self, scope_name: &str, offer: &Offer) {
        tracing::info!(
            target: "interaction",
            scope = scope_name,
            offer_id = %offer.id,
            offer_type = %offer.offer_type,
            "offer displayed"
        );
    }

    async fn report_tapped(&self, scope_name: &str, offer: &Offer) {
        tracing::info!(
            target: "interaction",
            scope = scope_name,
            offer_id = %offer.id,
            offer_type = %offer.offer_type,
            "offer tapped"
        );
    }
}
