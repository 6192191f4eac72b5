//! Domain Entities
//!
//! Core business entities for the pet domain.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Happiness;

/// Happiness of a pet seen for the first time
pub const DEFAULT_HAPPINESS: i64 = 80;

/// Per-user mood state
///
/// Serialized as `{"happiness": int, "lastInteraction": float}`; records
/// written under the older `last_pet` key are still readable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodRecord {
    pub happiness: Happiness,
    /// Unix seconds of the last interaction; the decay reference point
    #[serde(alias = "last_pet")]
    pub last_interaction: f64,
}

impl MoodRecord {
    pub fn new(happiness: Happiness, last_interaction: f64) -> Self {
        Self {
            happiness,
            last_interaction,
        }
    }

    /// Record synthesized for an identity with nothing stored yet
    pub fn fresh(now: f64) -> Self {
        Self::new(Happiness::new(DEFAULT_HAPPINESS), now)
    }
}
