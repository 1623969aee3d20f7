// src/config/model.rs

use serde::{Deserialize, Serialize};

/// Phase-gate admission floor for the omega score.
///
/// Unrelated to a roadmap's `scrutiny_config.improvement_threshold`.
pub const DEFAULT_OMEGA_FLOOR: f64 = 0.7;

/// Settings as read from TOML, before validation. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSchedulerConfig {
    #[serde(default)]
    pub gate: GateConfig,
}

/// `[gate]` section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(default = "default_omega_floor")]
    pub omega_floor: f64,
}

fn default_omega_floor() -> f64 {
    DEFAULT_OMEGA_FLOOR
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            omega_floor: default_omega_floor(),
        }
    }
}

/// Validated scheduler settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchedulerConfig {
    pub gate: GateConfig,
}

impl SchedulerConfig {
    pub(crate) fn new_unchecked(gate: GateConfig) -> Self {
        Self { gate }
    }
}
