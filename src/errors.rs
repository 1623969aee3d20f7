// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulerError {
    /// Structural problem in the roadmap or scheduler settings (duplicate ids,
    /// dangling dependency references, inconsistent counters, ...).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The unit graph contains at least one cycle; no plan can be produced.
    #[error("Cyclic dependency between units {units:?}: {detail}")]
    CyclicDependency { units: Vec<String>, detail: String },

    /// A completion was reported for a unit whose dependencies are not yet
    /// credited in the position.
    #[error("Unit '{unit}' completed before its dependencies {missing:?}")]
    OutOfOrderAdvancement { unit: String, missing: Vec<String> },

    /// Nothing is ready to run but the roadmap is not complete.
    #[error("Scheduling deadlock: no unit is ready, still pending {pending:?}")]
    SchedulingDeadlock { pending: Vec<String> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
