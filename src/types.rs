use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical unit identifier type used throughout the crate.
pub type UnitId = String;

/// Lifecycle of an [`ExecutionPosition`](crate::engine::ExecutionPosition).
///
/// Only ever moves `InProgress -> Complete`; never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionStatus {
    InProgress,
    Complete,
}

impl Default for PositionStatus {
    fn default() -> Self {
        PositionStatus::InProgress
    }
}

impl fmt::Display for PositionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionStatus::InProgress => f.write_str("IN_PROGRESS"),
            PositionStatus::Complete => f.write_str("COMPLETE"),
        }
    }
}

/// How the units of a batch may be dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchMode {
    /// Two or more mutually independent units.
    Parallel,
    /// Exactly one unit.
    Sequential,
}

impl BatchMode {
    pub fn for_len(len: usize) -> Self {
        if len > 1 {
            BatchMode::Parallel
        } else {
            BatchMode::Sequential
        }
    }
}

impl fmt::Display for BatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchMode::Parallel => f.write_str("PARALLEL"),
            BatchMode::Sequential => f.write_str("SEQUENTIAL"),
        }
    }
}
