// src/engine/dispatch.rs

//! Step-by-step dispatch for an orchestrator loop.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::dag::{CompletedSet, get_ready_units_in_phase, is_ready};
use crate::engine::position::{ExecutionPosition, ensure_same_roadmap, get_completed_ids};
use crate::errors::{Result, SchedulerError};
use crate::plan::ExecutionBatch;
use crate::roadmap::{RoadmapEnvelope, Unit};
use crate::types::{BatchMode, UnitId};

/// What the orchestrator should run next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextBatch {
    /// `None` iff `complete`.
    pub batch: Option<ExecutionBatch>,
    pub complete: bool,
    pub message: String,
}

/// Outcome of [`validate_batch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchValidation {
    pub valid: bool,
    /// Members that are completed already or still wait on dependencies.
    pub not_ready: Vec<UnitId>,
    /// `(dependency, dependent)` pairs that were proposed together.
    pub conflicts: Vec<(UnitId, UnitId)>,
    /// Ids listed more than once, reported once each.
    pub duplicates: Vec<UnitId>,
}

/// Every currently ready unit as one batch.
///
/// Phases do not act as barriers here: a later phase's unit is dispatched as
/// soon as its own dependencies are done.
pub fn get_next_batch(roadmap: &RoadmapEnvelope, pos: &ExecutionPosition) -> Result<NextBatch> {
    ensure_same_roadmap(pos, roadmap)?;

    let completed = get_completed_ids(pos);
    let done = roadmap
        .units()
        .filter(|u| completed.contains(&u.id))
        .count();

    if done == roadmap.total_units {
        info!(roadmap = %roadmap.id, units = done, "dispatch: roadmap complete");
        return Ok(NextBatch {
            batch: None,
            complete: true,
            message: format!("COMPLETE: all {done} units of roadmap '{}' are done", roadmap.id),
        });
    }

    // Same set as `get_ready_units(roadmap.units(), ..)`, in canonical order.
    let ready: Vec<Unit> = roadmap
        .phases
        .iter()
        .flat_map(|phase| get_ready_units_in_phase(phase, &completed))
        .cloned()
        .collect();

    if ready.is_empty() {
        let pending: Vec<UnitId> = pos.remaining(roadmap);
        error!(roadmap = %roadmap.id, ?pending, "dispatch: nothing ready on an incomplete roadmap");
        return Err(SchedulerError::SchedulingDeadlock { pending });
    }

    let batch = ExecutionBatch::new(ready);
    let ids = batch.unit_ids().join(", ");
    let message = match batch.mode() {
        BatchMode::Parallel => format!(
            "PARALLEL: dispatch {} independent units concurrently: {ids}",
            batch.len()
        ),
        BatchMode::Sequential => format!("SEQUENTIAL: dispatch single unit: {ids}"),
    };

    info!(
        roadmap = %roadmap.id,
        mode = %batch.mode(),
        units = %ids,
        "dispatch: next batch"
    );

    Ok(NextBatch {
        batch: Some(batch),
        complete: false,
        message,
    })
}

/// Check a caller-proposed batch of distinct, ready units.
///
/// A member that depends directly on another member is reported as a conflict.
pub fn validate_batch(units: &[Unit], completed: &CompletedSet) -> BatchValidation {
    let mut seen = HashSet::new();
    let mut duplicates: Vec<UnitId> = Vec::new();
    for u in units {
        if !seen.insert(u.id.as_str()) && !duplicates.contains(&u.id) {
            duplicates.push(u.id.clone());
        }
    }

    let not_ready: Vec<UnitId> = units
        .iter()
        .filter(|u| !is_ready(u, completed))
        .map(|u| u.id.clone())
        .collect();

    let mut conflicts = Vec::new();
    for (i, a) in units.iter().enumerate() {
        for b in units.iter().skip(i + 1) {
            if b.dependencies.contains(&a.id) {
                conflicts.push((a.id.clone(), b.id.clone()));
            }
            if a.dependencies.contains(&b.id) {
                conflicts.push((b.id.clone(), a.id.clone()));
            }
        }
    }

    BatchValidation {
        valid: not_ready.is_empty() && conflicts.is_empty() && duplicates.is_empty(),
        not_ready,
        conflicts,
        duplicates,
    }
}
