// src/engine/position.rs

//! Copy-on-write cursor over roadmap progress.
//!
//! An [`ExecutionPosition`] is never mutated in place. Every advancement
//! returns a fresh value derived from the previous one plus a
//! [`PositionDelta`], so callers can persist the result atomically and retry
//! a failed persist without double-crediting anything.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::dag::{CompletedSet, UnitGraph, build_dependency_dag};
use crate::errors::{Result, SchedulerError};
use crate::roadmap::RoadmapEnvelope;
use crate::types::{PositionStatus, UnitId};

/// One credited completion, kept for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub unit_id: UnitId,
    pub completed_at: DateTime<Utc>,
    /// Build result reported by the executor. Recorded only; crediting does
    /// not depend on it.
    pub build_status: bool,
}

/// Completion report from the unit executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCompletion {
    pub unit_id: UnitId,
    pub build_passed: bool,
}

impl UnitCompletion {
    pub fn new(unit_id: impl Into<String>, build_passed: bool) -> Self {
        Self {
            unit_id: unit_id.into(),
            build_passed,
        }
    }

    /// Completion with a passing build.
    pub fn passed(unit_id: impl Into<String>) -> Self {
        Self::new(unit_id, true)
    }
}

/// Durable progress cursor for one roadmap run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionPosition {
    pub roadmap_id: String,
    /// Lowest-ordered ready unit; `None` once complete.
    pub current_unit: Option<UnitId>,
    pub current_phase: Option<String>,
    pub units_completed: usize,
    pub total_units: usize,
    /// `round(100 * units_completed / total_units)`, within `0..=100`.
    pub percent_complete: u8,
    pub status: PositionStatus,
    pub last_completed_unit: Option<UnitId>,
    /// Append-only.
    pub history: Vec<HistoryEntry>,
}

/// Changes produced by one advancement.
#[derive(Debug, Clone)]
pub struct PositionDelta {
    pub appended: Vec<HistoryEntry>,
    pub units_completed: usize,
    pub percent_complete: u8,
    pub status: PositionStatus,
    pub current_unit: Option<UnitId>,
    pub current_phase: Option<String>,
    pub last_completed_unit: Option<UnitId>,
}

impl ExecutionPosition {
    /// Build the successor position from `self` plus `delta`.
    pub fn with_delta(&self, delta: PositionDelta) -> ExecutionPosition {
        let mut history = Vec::with_capacity(self.history.len() + delta.appended.len());
        history.extend(self.history.iter().cloned());
        history.extend(delta.appended);

        ExecutionPosition {
            roadmap_id: self.roadmap_id.clone(),
            current_unit: delta.current_unit,
            current_phase: delta.current_phase,
            units_completed: delta.units_completed,
            total_units: self.total_units,
            percent_complete: delta.percent_complete,
            status: delta.status,
            last_completed_unit: delta.last_completed_unit,
            history,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == PositionStatus::Complete
    }

    /// Units of `roadmap` not yet credited, in declared order.
    pub fn remaining(&self, roadmap: &RoadmapEnvelope) -> Vec<UnitId> {
        let completed = get_completed_ids(self);
        roadmap
            .units()
            .filter(|u| !completed.contains(&u.id))
            .map(|u| u.id.clone())
            .collect()
    }
}

impl fmt::Display for ExecutionPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{} ({}%)",
            self.status, self.units_completed, self.total_units, self.percent_complete
        )?;
        if let Some(ref unit) = self.current_unit {
            write!(f, " current={unit}")?;
            if let Some(ref phase) = self.current_phase {
                write!(f, " [{phase}]")?;
            }
        }
        Ok(())
    }
}

/// Start a run: the cursor points at the lowest-ordered unit of layer 0.
///
/// Refuses roadmaps with dangling references or cycles.
pub fn create_initial_position(roadmap: &RoadmapEnvelope) -> Result<ExecutionPosition> {
    let dag = build_dependency_dag(roadmap)?;
    dag.ensure_acyclic()?;

    let current_unit = dag.layers.first().and_then(|layer| layer.first()).cloned();
    let current_phase = current_unit
        .as_deref()
        .and_then(|id| roadmap.phase_of_unit(id))
        .map(|p| p.id.clone());

    let (status, percent_complete) = if roadmap.total_units == 0 {
        (PositionStatus::Complete, 100)
    } else {
        (PositionStatus::InProgress, 0)
    };

    debug!(
        roadmap = %roadmap.id,
        current_unit = ?current_unit,
        total_units = roadmap.total_units,
        "position: created"
    );

    Ok(ExecutionPosition {
        roadmap_id: roadmap.id.clone(),
        current_unit,
        current_phase,
        units_completed: 0,
        total_units: roadmap.total_units,
        percent_complete,
        status,
        last_completed_unit: None,
        history: Vec::new(),
    })
}

/// Credit `completions` and return the successor position, stamped with the
/// current time.
pub fn advance_position(
    pos: &ExecutionPosition,
    completions: &[UnitCompletion],
    roadmap: &RoadmapEnvelope,
) -> Result<ExecutionPosition> {
    advance_position_at(pos, completions, roadmap, Utc::now())
}

/// [`advance_position`] with an explicit timestamp.
///
/// Completions are credited in the order given, so a dependency and its
/// dependent may arrive in the same call as long as the dependency comes
/// first. If any completion is rejected the whole call fails and nothing is
/// credited; `pos` is never modified.
pub fn advance_position_at(
    pos: &ExecutionPosition,
    completions: &[UnitCompletion],
    roadmap: &RoadmapEnvelope,
    now: DateTime<Utc>,
) -> Result<ExecutionPosition> {
    ensure_same_roadmap(pos, roadmap)?;

    let graph = UnitGraph::from_roadmap(roadmap)?;
    let mut completed = get_completed_ids(pos);
    let mut appended = Vec::with_capacity(completions.len());
    let mut last_completed_unit = pos.last_completed_unit.clone();

    for completion in completions {
        let Some(idx) = graph.index_of(&completion.unit_id) else {
            return Err(SchedulerError::Configuration(format!(
                "completion reported for unknown unit '{}'",
                completion.unit_id
            )));
        };

        let missing: Vec<UnitId> = graph
            .dependencies(idx)
            .iter()
            .map(|&d| graph.id(d))
            .filter(|dep| !completed.contains(*dep))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(SchedulerError::OutOfOrderAdvancement {
                unit: completion.unit_id.clone(),
                missing,
            });
        }

        if completed.insert(completion.unit_id.clone()) {
            info!(
                unit = %completion.unit_id,
                build_passed = completion.build_passed,
                "position: unit credited"
            );
        } else {
            warn!(
                unit = %completion.unit_id,
                "position: unit already completed; recording in history only"
            );
        }

        appended.push(HistoryEntry {
            unit_id: completion.unit_id.clone(),
            completed_at: now,
            build_status: completion.build_passed,
        });
        last_completed_unit = Some(completion.unit_id.clone());
    }

    let units_completed = completed
        .iter()
        .filter(|id| graph.index_of(id).is_some())
        .count()
        .max(pos.units_completed);
    let total = roadmap.total_units;

    let delta = if pos.is_complete() || units_completed >= total {
        if !pos.is_complete() {
            info!(roadmap = %roadmap.id, units = total, "position: roadmap complete");
        }
        PositionDelta {
            appended,
            units_completed,
            percent_complete: 100,
            status: PositionStatus::Complete,
            current_unit: None,
            current_phase: None,
            last_completed_unit,
        }
    } else {
        let current = next_current_unit(&graph, &completed);
        PositionDelta {
            appended,
            units_completed,
            percent_complete: percent(units_completed, total),
            status: PositionStatus::InProgress,
            current_unit: current.map(|i| graph.id(i).to_string()),
            current_phase: current.map(|i| roadmap.phases[graph.phase_index(i)].id.clone()),
            last_completed_unit,
        }
    };

    Ok(pos.with_delta(delta))
}

/// Ids credited as completed, derived from the history.
pub fn get_completed_ids(pos: &ExecutionPosition) -> CompletedSet {
    pos.history.iter().map(|h| h.unit_id.clone()).collect()
}

/// Reject a position that was created for a different roadmap.
pub(crate) fn ensure_same_roadmap(
    pos: &ExecutionPosition,
    roadmap: &RoadmapEnvelope,
) -> Result<()> {
    if pos.roadmap_id != roadmap.id {
        return Err(SchedulerError::Configuration(format!(
            "position belongs to roadmap '{}', not '{}'",
            pos.roadmap_id, roadmap.id
        )));
    }
    if pos.total_units != roadmap.total_units {
        return Err(SchedulerError::Configuration(format!(
            "position of roadmap '{}' tracks {} units but the roadmap has {}",
            roadmap.id, pos.total_units, roadmap.total_units
        )));
    }
    Ok(())
}

/// Lowest-ordered ready unit.
fn next_current_unit(graph: &UnitGraph, completed: &CompletedSet) -> Option<usize> {
    (0..graph.len())
        .filter(|&i| {
            !completed.contains(graph.id(i))
                && graph
                    .dependencies(i)
                    .iter()
                    .all(|&d| completed.contains(graph.id(d)))
        })
        .min_by_key(|&i| graph.order_key(i))
}

fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = (100.0 * done as f64 / total as f64).round();
    pct.clamp(0.0, 100.0) as u8
}
