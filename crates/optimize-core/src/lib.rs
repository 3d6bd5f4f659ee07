//! Core domain layer for the Optimize personalization SDK.
//!
//! This crate holds the domain models (decision scopes, offers,
//! propositions), the typed error surface, the personalization event types,
//! and the trait seams toward the external messaging channel and the
//! interaction-reporting collaborator. Orchestration lives in
//! `optimize-application`; in-process channel implementations live in
//! `optimize-messaging`.

pub mod config;
pub mod decisioning;
pub mod error;
pub mod proposition;

// Re-export common error types
pub use decisioning::{DecisioningError, DecisioningErrorKind};
pub use error::{OptimizeError, Result};
