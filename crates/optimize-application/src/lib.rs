//! Application layer for Optimize.
//!
//! This crate provides the proposition cache and the service that
//! coordinates between the domain layer, the messaging channel, and the
//! reporting collaborator.

pub mod proposition;

pub use proposition::{PropositionCallback, PropositionService, PropositionStore};
