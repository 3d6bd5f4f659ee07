//! Configuration for the personalization core.

use serde::{Deserialize, Serialize};

fn default_channel_capacity() -> usize {
    64
}

/// Tunables shared by the SDK crates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizeConfig {
    /// Bounded capacity of the request queue toward the decisioning service.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}
