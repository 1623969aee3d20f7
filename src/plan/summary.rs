// src/plan/summary.rs

use std::fmt::Write;

use crate::plan::batch::RoadmapExecutionPlan;

/// Render a plan as a deterministic plain-text report.
///
/// ```text
/// ROADMAP EXECUTION PLAN
/// ======================
/// Roadmap: demo
///
/// Phase P1: Foundations (3 batches, 4 units)
///   Batch 1 [SEQUENTIAL] U1
///   Batch 2 [PARALLEL x2] U2, U3
///   Batch 3 [SEQUENTIAL] U4
///
/// Total: 3 batches (1 parallel, 2 sequential), 4 units
/// ```
pub fn summarize_plan(plan: &RoadmapExecutionPlan) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_plan(&mut out, plan);
    out
}

fn write_plan(out: &mut String, plan: &RoadmapExecutionPlan) -> std::fmt::Result {
    writeln!(out, "ROADMAP EXECUTION PLAN")?;
    writeln!(out, "======================")?;
    writeln!(out, "Roadmap: {}", plan.roadmap_id)?;

    let mut batch_no = 0;
    for phase in plan.phases.iter() {
        writeln!(out)?;
        if phase.phase_title.is_empty() {
            write!(out, "Phase {}", phase.phase_id)?;
        } else {
            write!(out, "Phase {}: {}", phase.phase_id, phase.phase_title)?;
        }
        writeln!(
            out,
            " ({}, {})",
            counted(phase.total_batches, "batch", "batches"),
            counted(phase.total_units, "unit", "units")
        )?;

        for batch in phase.batches.iter() {
            batch_no += 1;
            let ids = batch.unit_ids().join(", ");
            if batch.parallel {
                writeln!(out, "  Batch {batch_no} [PARALLEL x{}] {ids}", batch.len())?;
            } else {
                writeln!(out, "  Batch {batch_no} [SEQUENTIAL] {ids}")?;
            }
        }

        if !phase.blocked.is_empty() {
            writeln!(out, "  Blocked: {}", phase.blocked.join(", "))?;
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "Total: {} ({} parallel, {} sequential), {}",
        counted(plan.total_batches, "batch", "batches"),
        plan.parallel_batches,
        plan.sequential_batches,
        counted(plan.total_units, "unit", "units")
    )?;
    Ok(())
}

fn counted(n: usize, one: &str, many: &str) -> String {
    format!("{n} {}", if n == 1 { one } else { many })
}
