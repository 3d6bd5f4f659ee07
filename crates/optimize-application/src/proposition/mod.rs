//! Proposition caching and orchestration.
//!
//! # Module Structure
//!
//! - `store`: In-memory cache of the latest proposition per decision scope
//! - `service`: Update/get/clear orchestration and response routing

mod service;
mod store;

// Re-export public API
pub use service::{PropositionCallback, PropositionService};
pub use store::PropositionStore;
