// src/plan/planner.rs

use tracing::{debug, info, warn};

use crate::dag::{CompletedSet, build_dependency_dag, get_ready_units_in_phase};
use crate::errors::Result;
use crate::plan::batch::{ExecutionBatch, PhaseExecutionPlan, RoadmapExecutionPlan};
use crate::roadmap::{Phase, RoadmapEnvelope};
use crate::types::UnitId;

/// Plan a single phase starting from `completed`.
///
/// Each step takes the phase's current ready set as one batch (parallel when
/// it has two or more units) and adds it to a simulated completed set, until
/// nothing more becomes ready. `completed` itself is left untouched.
///
/// Units whose dependencies never resolve within this simulation are listed
/// in [`PhaseExecutionPlan::blocked`].
pub fn plan_phase_execution(phase: &Phase, completed: &CompletedSet) -> PhaseExecutionPlan {
    let mut simulated = completed.clone();
    let mut batches = Vec::new();

    loop {
        let ready = get_ready_units_in_phase(phase, &simulated);
        if ready.is_empty() {
            break;
        }

        let batch = ExecutionBatch::new(ready.into_iter().cloned().collect());
        for unit in batch.units.iter() {
            simulated.insert(unit.id.clone());
        }

        debug!(
            phase = %phase.id,
            batch = batches.len() + 1,
            mode = %batch.mode(),
            units = ?batch.unit_ids(),
            "plan: batch emitted"
        );
        batches.push(batch);
    }

    let blocked: Vec<UnitId> = phase
        .units
        .iter()
        .filter(|u| !simulated.contains(&u.id))
        .map(|u| u.id.clone())
        .collect();

    if !blocked.is_empty() {
        warn!(
            phase = %phase.id,
            ?blocked,
            "plan: units with unresolved dependencies left out of the phase plan"
        );
    }

    PhaseExecutionPlan::from_batches(phase, batches, blocked)
}

/// Plan the whole roadmap from scratch.
///
/// Refuses cyclic roadmaps with `CyclicDependency` and dangling references
/// with `Configuration`.
pub fn plan_roadmap_execution(roadmap: &RoadmapEnvelope) -> Result<RoadmapExecutionPlan> {
    plan_remaining_execution(roadmap, &CompletedSet::new())
}

/// Plan the work that remains after `completed`.
///
/// Phases are planned in declared order with one running completed set: after
/// a phase is planned, all of its unit ids are added to the set so that later
/// phases can resolve cross-phase dependencies.
pub fn plan_remaining_execution(
    roadmap: &RoadmapEnvelope,
    completed: &CompletedSet,
) -> Result<RoadmapExecutionPlan> {
    build_dependency_dag(roadmap)?.ensure_acyclic()?;

    let mut running = completed.clone();
    let mut phases = Vec::with_capacity(roadmap.phases.len());

    for phase in roadmap.phases.iter() {
        let plan = plan_phase_execution(phase, &running);
        running.extend(phase.units.iter().map(|u| u.id.clone()));
        phases.push(plan);
    }

    let plan = RoadmapExecutionPlan::from_phases(&roadmap.id, phases);
    info!(
        roadmap = %roadmap.id,
        batches = plan.total_batches,
        parallel = plan.parallel_batches,
        sequential = plan.sequential_batches,
        units = plan.total_units,
        "plan: roadmap planned"
    );
    Ok(plan)
}
