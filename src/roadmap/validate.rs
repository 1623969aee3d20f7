// src/roadmap/validate.rs

use std::collections::HashSet;

use crate::dag::UnitGraph;
use crate::errors::{Result, SchedulerError};
use crate::roadmap::model::{Phase, RawRoadmap, RoadmapEnvelope};

impl TryFrom<RawRoadmap> for RoadmapEnvelope {
    type Error = SchedulerError;

    fn try_from(raw: RawRoadmap) -> std::result::Result<Self, Self::Error> {
        let declared_total = raw.total_units;
        let phases = adopt_phase_ids(raw.phases);
        let roadmap =
            RoadmapEnvelope::new_unchecked(raw.id, raw.version, phases, raw.scrutiny_config);

        if let Some(declared) = declared_total {
            if declared != roadmap.total_units {
                return Err(SchedulerError::Configuration(format!(
                    "roadmap '{}' declares total_units = {} but its phases contain {} units",
                    roadmap.id, declared, roadmap.total_units
                )));
            }
        }

        validate_roadmap(&roadmap)?;
        Ok(roadmap)
    }
}

/// Fill in `phase_id` for units that omitted it.
fn adopt_phase_ids(phases: Vec<Phase>) -> Vec<Phase> {
    phases
        .into_iter()
        .map(|mut phase| {
            for unit in phase.units.iter_mut() {
                if unit.phase_id.is_empty() {
                    unit.phase_id = phase.id.clone();
                }
            }
            phase
        })
        .collect()
}

/// Check every structural invariant of a roadmap:
///
/// - non-empty roadmap id,
/// - unique phase ids and units that agree with their containing phase,
/// - `total_units` equal to the sum of phase unit counts,
/// - sane scrutiny settings,
/// - unique unit ids and dependencies that resolve to real units.
///
/// Cycles are *not* a validation failure here; they are reported by
/// [`build_dependency_dag`](crate::dag::build_dependency_dag).
pub fn validate_roadmap(roadmap: &RoadmapEnvelope) -> Result<()> {
    ensure_has_id(roadmap)?;
    validate_phases(roadmap)?;
    validate_total_units(roadmap)?;
    validate_scrutiny(roadmap)?;
    UnitGraph::from_roadmap(roadmap)?;
    Ok(())
}

fn ensure_has_id(roadmap: &RoadmapEnvelope) -> Result<()> {
    if roadmap.id.trim().is_empty() {
        return Err(SchedulerError::Configuration(
            "roadmap id must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_phases(roadmap: &RoadmapEnvelope) -> Result<()> {
    let mut seen = HashSet::new();
    for phase in roadmap.phases.iter() {
        if !seen.insert(phase.id.as_str()) {
            return Err(SchedulerError::Configuration(format!(
                "duplicate phase id '{}'",
                phase.id
            )));
        }
        for unit in phase.units.iter() {
            if unit.phase_id != phase.id {
                return Err(SchedulerError::Configuration(format!(
                    "unit '{}' declares phase_id '{}' but is listed under phase '{}'",
                    unit.id, unit.phase_id, phase.id
                )));
            }
        }
    }
    Ok(())
}

fn validate_total_units(roadmap: &RoadmapEnvelope) -> Result<()> {
    let actual: usize = roadmap.phases.iter().map(|p| p.units.len()).sum();
    if roadmap.total_units != actual {
        return Err(SchedulerError::Configuration(format!(
            "roadmap '{}' has total_units = {} but its phases contain {} units",
            roadmap.id, roadmap.total_units, actual
        )));
    }
    Ok(())
}

fn validate_scrutiny(roadmap: &RoadmapEnvelope) -> Result<()> {
    let cfg = &roadmap.scrutiny_config;
    if cfg.min_passes > cfg.max_passes {
        return Err(SchedulerError::Configuration(format!(
            "scrutiny_config.min_passes ({}) must be <= max_passes ({})",
            cfg.min_passes, cfg.max_passes
        )));
    }
    if !(0.0..=1.0).contains(&cfg.improvement_threshold) {
        return Err(SchedulerError::Configuration(format!(
            "scrutiny_config.improvement_threshold must be within [0, 1] (got {})",
            cfg.improvement_threshold
        )));
    }
    Ok(())
}
