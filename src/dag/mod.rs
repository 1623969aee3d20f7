// src/dag/mod.rs

//! Dependency graph and ready-set resolution.
//!
//! - [`graph`] resolves unit ids to dense indices and holds adjacency.
//! - [`layers`] computes topological layers and detects cycles.
//! - [`ready`] decides which units may run given a completed set.

pub mod graph;
pub mod layers;
pub mod ready;

pub use graph::UnitGraph;
pub use layers::{DependencyDag, build_dependency_dag};
pub use ready::{CompletedSet, get_ready_units, get_ready_units_in_phase, is_ready};
