// src/engine/gate.rs

//! Phase admission checks.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::GateConfig;
use crate::dag::CompletedSet;
use crate::roadmap::Phase;

pub const ALL_UNITS_COMPLETE: &str = "all_units_complete";
pub const BUILD_PASSES: &str = "build_passes";
pub const TESTS_PASS: &str = "tests_pass";
pub const ANTI_REGRESSION: &str = "anti_regression";
pub const OMEGA_FLOOR: &str = "omega_floor";

/// Quality signals reported by the unit executor for a phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseMetrics {
    pub build_passed: bool,
    pub tests_passed: bool,
    pub test_count: u64,
    pub baseline_test_count: u64,
    /// Composite build/test/doc quality score in `[0, 1]`.
    pub omega_score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateCheck {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseGateResult {
    /// AND of every check.
    pub passed: bool,
    pub checks: Vec<GateCheck>,
}

impl PhaseGateResult {
    pub fn failed_checks(&self) -> impl Iterator<Item = &GateCheck> {
        self.checks.iter().filter(|c| !c.passed)
    }

    pub fn check(&self, name: &str) -> Option<&GateCheck> {
        self.checks.iter().find(|c| c.name == name)
    }
}

/// Gate a phase using the default omega floor.
pub fn check_phase_gate(
    phase: &Phase,
    completed: &CompletedSet,
    metrics: &PhaseMetrics,
) -> PhaseGateResult {
    check_phase_gate_with(phase, completed, metrics, &GateConfig::default())
}

/// Gate a phase: every unit done, build and tests green, no fewer tests than
/// the baseline, and an omega score at or above the configured floor.
pub fn check_phase_gate_with(
    phase: &Phase,
    completed: &CompletedSet,
    metrics: &PhaseMetrics,
    cfg: &GateConfig,
) -> PhaseGateResult {
    let missing: Vec<&str> = phase
        .units
        .iter()
        .filter(|u| !completed.contains(&u.id))
        .map(|u| u.id.as_str())
        .collect();

    let checks = vec![
        GateCheck {
            name: ALL_UNITS_COMPLETE.to_string(),
            passed: missing.is_empty(),
            detail: if missing.is_empty() {
                format!("{} of {} units complete", phase.units.len(), phase.units.len())
            } else {
                format!("incomplete units: {}", missing.join(", "))
            },
        },
        GateCheck {
            name: BUILD_PASSES.to_string(),
            passed: metrics.build_passed,
            detail: format!("build passed: {}", metrics.build_passed),
        },
        GateCheck {
            name: TESTS_PASS.to_string(),
            passed: metrics.tests_passed,
            detail: format!("tests passed: {}", metrics.tests_passed),
        },
        GateCheck {
            name: ANTI_REGRESSION.to_string(),
            passed: metrics.test_count >= metrics.baseline_test_count,
            detail: format!(
                "test count {} vs baseline {}",
                metrics.test_count, metrics.baseline_test_count
            ),
        },
        GateCheck {
            name: OMEGA_FLOOR.to_string(),
            passed: metrics.omega_score >= cfg.omega_floor,
            detail: format!(
                "omega score {:.2} vs floor {:.2}",
                metrics.omega_score, cfg.omega_floor
            ),
        },
    ];

    let passed = checks.iter().all(|c| c.passed);
    for check in checks.iter().filter(|c| !c.passed) {
        warn!(phase = %phase.id, check = %check.name, detail = %check.detail, "gate: check failed");
    }
    debug!(phase = %phase.id, passed, "gate: evaluated");

    PhaseGateResult { passed, checks }
}
