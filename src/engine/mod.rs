// src/engine/mod.rs

//! Run-time side of the scheduler.
//!
//! - [`position`] tracks progress through a roadmap run as an immutable,
//!   persistable cursor.
//! - [`gate`] decides whether a phase may be considered closed.
//! - [`dispatch`] answers "what runs next?" for an orchestrator loop.
//!
//! Nothing here performs IO or executes units; every function is a pure
//! computation over its arguments.

pub mod dispatch;
pub mod gate;
pub mod position;

pub use dispatch::{BatchValidation, NextBatch, get_next_batch, validate_batch};
pub use gate::{GateCheck, PhaseGateResult, PhaseMetrics, check_phase_gate, check_phase_gate_with};
pub use position::{
    ExecutionPosition, HistoryEntry, PositionDelta, UnitCompletion, advance_position,
    advance_position_at, create_initial_position, get_completed_ids,
};
