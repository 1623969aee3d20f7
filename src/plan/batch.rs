// src/plan/batch.rs

use serde::{Deserialize, Serialize};

use crate::roadmap::{Phase, Unit};
use crate::types::{BatchMode, UnitId};

/// One planning step's worth of dispatchable units.
///
/// All members are mutually independent; `parallel` is true iff there are at
/// least two of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionBatch {
    pub units: Vec<Unit>,
    pub parallel: bool,
}

impl ExecutionBatch {
    pub fn new(units: Vec<Unit>) -> Self {
        let parallel = units.len() > 1;
        Self { units, parallel }
    }

    pub fn mode(&self) -> BatchMode {
        BatchMode::for_len(self.units.len())
    }

    pub fn unit_ids(&self) -> Vec<UnitId> {
        self.units.iter().map(|u| u.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Ordered batches for a single phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseExecutionPlan {
    pub phase_id: String,
    pub phase_title: String,
    pub batches: Vec<ExecutionBatch>,
    pub parallel_batches: usize,
    pub sequential_batches: usize,
    /// Units placed in some batch.
    pub total_units: usize,
    pub total_batches: usize,
    /// Phase units that never became ready (their dependencies lie outside
    /// the completed set the plan started from).
    #[serde(default)]
    pub blocked: Vec<UnitId>,
}

impl PhaseExecutionPlan {
    pub(crate) fn from_batches(
        phase: &Phase,
        batches: Vec<ExecutionBatch>,
        blocked: Vec<UnitId>,
    ) -> Self {
        let parallel_batches = batches.iter().filter(|b| b.parallel).count();
        let total_units = batches.iter().map(|b| b.len()).sum();
        Self {
            phase_id: phase.id.clone(),
            phase_title: phase.title.clone(),
            total_batches: batches.len(),
            sequential_batches: batches.len() - parallel_batches,
            parallel_batches,
            total_units,
            batches,
            blocked,
        }
    }
}

/// Phase plans in declared order plus roadmap-wide counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapExecutionPlan {
    pub roadmap_id: String,
    pub phases: Vec<PhaseExecutionPlan>,
    pub parallel_batches: usize,
    pub sequential_batches: usize,
    pub total_units: usize,
    pub total_batches: usize,
}

impl RoadmapExecutionPlan {
    pub(crate) fn from_phases(roadmap_id: &str, phases: Vec<PhaseExecutionPlan>) -> Self {
        Self {
            roadmap_id: roadmap_id.to_string(),
            parallel_batches: phases.iter().map(|p| p.parallel_batches).sum(),
            sequential_batches: phases.iter().map(|p| p.sequential_batches).sum(),
            total_units: phases.iter().map(|p| p.total_units).sum(),
            total_batches: phases.iter().map(|p| p.total_batches).sum(),
            phases,
        }
    }

    /// Every batch of every phase, in execution order.
    pub fn batches(&self) -> impl Iterator<Item = &ExecutionBatch> {
        self.phases.iter().flat_map(|p| p.batches.iter())
    }
}
