// src/lib.rs

//! Dependency-aware scheduler for multi-phase engineering roadmaps.
//!
//! A roadmap is a tree of phases owning units; units carry dependency edges
//! that may cross phases. This crate turns it into:
//! - topological layers ([`build_dependency_dag`]),
//! - ready sets ([`get_ready_units`], [`get_ready_units_in_phase`]),
//! - batch plans ([`plan_phase_execution`], [`plan_roadmap_execution`],
//!   [`summarize_plan`]),
//! - a persistable progress cursor ([`create_initial_position`],
//!   [`advance_position`], [`get_completed_ids`]),
//! - phase admission checks ([`check_phase_gate`]),
//! - step-by-step dispatch ([`get_next_batch`], [`validate_batch`]).
//!
//! It never executes units itself.

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod plan;
pub mod roadmap;
pub mod types;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::debug;

pub use crate::dag::{
    CompletedSet, DependencyDag, build_dependency_dag, get_ready_units, get_ready_units_in_phase,
};
pub use crate::engine::{
    BatchValidation, ExecutionPosition, NextBatch, PhaseGateResult, PhaseMetrics, UnitCompletion,
    advance_position, check_phase_gate, check_phase_gate_with, create_initial_position,
    get_completed_ids, get_next_batch, validate_batch,
};
pub use crate::errors::SchedulerError;
pub use crate::plan::{
    ExecutionBatch, PhaseExecutionPlan, RoadmapExecutionPlan, plan_phase_execution,
    plan_roadmap_execution, summarize_plan,
};
pub use crate::roadmap::{Phase, RoadmapEnvelope, Unit};

use crate::cli::{CliArgs, Command};
use crate::config::load_or_default;
use crate::plan::plan_remaining_execution;

/// High-level entry point used by `main.rs`.
///
/// Loads settings and the roadmap, runs one scheduler operation and prints
/// its report to stdout.
pub fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(args.config.as_deref()).context("loading scheduler settings")?;
    debug!(omega_floor = cfg.gate.omega_floor, "settings loaded");

    match args.command {
        Command::Plan { roadmap, position } => {
            let roadmap = load_roadmap(&roadmap)?;
            let completed = match position {
                Some(path) => get_completed_ids(&load_position(&path)?),
                None => CompletedSet::new(),
            };
            let plan = plan_remaining_execution(&roadmap, &completed)?;
            print!("{}", summarize_plan(&plan));
        }
        Command::Layers { roadmap } => {
            let roadmap = load_roadmap(&roadmap)?;
            print_layers(&build_dependency_dag(&roadmap)?);
        }
        Command::Next { roadmap, position } => {
            let roadmap = load_roadmap(&roadmap)?;
            let position = match position {
                Some(path) => load_position(&path)?,
                None => create_initial_position(&roadmap)?,
            };
            println!("{position}");
            let next = get_next_batch(&roadmap, &position)?;
            println!("{}", next.message);
        }
        Command::Gate {
            roadmap,
            phase,
            metrics,
            position,
        } => {
            let roadmap = load_roadmap(&roadmap)?;
            let Some(phase) = roadmap.phase(&phase) else {
                bail!("roadmap '{}' has no phase '{}'", roadmap.id, phase);
            };
            let metrics: PhaseMetrics = read_json(&metrics).context("reading phase metrics")?;
            let completed = match position {
                Some(path) => get_completed_ids(&load_position(&path)?),
                None => CompletedSet::new(),
            };

            let result = check_phase_gate_with(phase, &completed, &metrics, &cfg.gate);
            for check in result.checks.iter() {
                let mark = if check.passed { "PASS" } else { "FAIL" };
                println!("[{mark}] {}: {}", check.name, check.detail);
            }
            if !result.passed {
                bail!("phase gate for '{}' failed", phase.id);
            }
            println!("phase gate for '{}' passed", phase.id);
        }
    }

    Ok(())
}

fn load_roadmap(path: &Path) -> Result<RoadmapEnvelope> {
    roadmap::load_and_validate(path).with_context(|| format!("loading roadmap from {:?}", path))
}

fn load_position(path: &Path) -> Result<ExecutionPosition> {
    read_json(path).with_context(|| format!("loading position from {:?}", path))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    let value = serde_json::from_str(&contents)?;
    Ok(value)
}

fn print_layers(dag: &DependencyDag) {
    println!("units: {}", dag.total_units);
    if dag.has_cycles {
        println!("CYCLE DETECTED");
        if let Some(ref info) = dag.cycle_info {
            println!("  {info}");
        }
        return;
    }
    for (i, layer) in dag.layers.iter().enumerate() {
        println!("layer {i}: {}", layer.join(", "));
    }
}
