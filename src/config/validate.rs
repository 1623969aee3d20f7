// src/config/validate.rs

use crate::config::model::{RawSchedulerConfig, SchedulerConfig};
use crate::errors::{Result, SchedulerError};

impl TryFrom<RawSchedulerConfig> for SchedulerConfig {
    type Error = SchedulerError;

    fn try_from(raw: RawSchedulerConfig) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(SchedulerConfig::new_unchecked(raw.gate))
    }
}

fn validate_raw_config(cfg: &RawSchedulerConfig) -> Result<()> {
    validate_gate(cfg)?;
    Ok(())
}

fn validate_gate(cfg: &RawSchedulerConfig) -> Result<()> {
    let floor = cfg.gate.omega_floor;
    if !floor.is_finite() || !(0.0..=1.0).contains(&floor) {
        return Err(SchedulerError::Configuration(format!(
            "[gate].omega_floor must be within [0, 1] (got {floor})"
        )));
    }
    Ok(())
}
