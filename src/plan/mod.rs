// src/plan/mod.rs

//! Offline execution planning.
//!
//! Planning simulates execution without running anything: it repeatedly takes
//! the current ready set, emits it as one batch and pretends it completed.

pub mod batch;
pub mod planner;
pub mod summary;

pub use batch::{ExecutionBatch, PhaseExecutionPlan, RoadmapExecutionPlan};
pub use planner::{plan_phase_execution, plan_remaining_execution, plan_roadmap_execution};
pub use summary::summarize_plan;
