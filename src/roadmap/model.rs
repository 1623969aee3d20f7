// src/roadmap/model.rs

use serde::{Deserialize, Serialize};

use crate::types::UnitId;

/// Roadmap document as read from JSON, before validation.
///
/// ```json
/// {
///   "id": "roadmap-1",
///   "version": "1.0",
///   "phases": [
///     { "id": "P1", "title": "Foundations", "units": [
///       { "id": "U1", "seq": 1 },
///       { "id": "U2", "seq": 2, "dependencies": ["U1"] }
///     ]}
///   ],
///   "scrutiny_config": { "min_passes": 1, "max_passes": 3, "improvement_threshold": 0.92 }
/// }
/// ```
///
/// Everything except `id` and the unit ids is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRoadmap {
    pub id: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub phases: Vec<Phase>,

    /// Declared unit count; checked against the phases when present.
    #[serde(default)]
    pub total_units: Option<usize>,

    #[serde(default)]
    pub scrutiny_config: ScrutinyConfig,
}

fn default_version() -> String {
    "1.0".to_string()
}

/// Smallest schedulable item of work.
///
/// The payload is opaque to the scheduler: only the id, ordering and
/// dependency edges matter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,

    #[serde(default)]
    pub title: String,

    /// Id of the containing phase. Filled from the phase when omitted.
    #[serde(default)]
    pub phase_id: String,

    /// Tie-break order within a phase.
    #[serde(default)]
    pub seq: i64,

    /// Units that must complete before this one may start. May point into
    /// any phase.
    #[serde(default)]
    pub dependencies: Vec<UnitId>,

    #[serde(default)]
    pub estimated_tokens: u64,
}

/// Ordered, mostly organisational grouping of units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub units: Vec<Unit>,
}

/// Review-pass settings carried by the roadmap.
///
/// These govern multi-pass review convergence and are independent of the
/// phase-gate omega floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrutinyConfig {
    #[serde(default = "default_min_passes")]
    pub min_passes: u32,

    #[serde(default = "default_max_passes")]
    pub max_passes: u32,

    #[serde(default = "default_improvement_threshold")]
    pub improvement_threshold: f64,
}

fn default_min_passes() -> u32 {
    1
}

fn default_max_passes() -> u32 {
    3
}

fn default_improvement_threshold() -> f64 {
    0.92
}

impl Default for ScrutinyConfig {
    fn default() -> Self {
        Self {
            min_passes: default_min_passes(),
            max_passes: default_max_passes(),
            improvement_threshold: default_improvement_threshold(),
        }
    }
}

/// Validated roadmap: the root aggregate owning every phase and unit.
///
/// Obtain one through [`RoadmapEnvelope::new`], `TryFrom<RawRoadmap>` or the
/// [`loader`](crate::roadmap::loader) functions. Treated as immutable input by
/// every scheduler operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRoadmap")]
pub struct RoadmapEnvelope {
    pub id: String,
    pub version: String,
    pub phases: Vec<Phase>,
    /// Always equal to the sum of the phases' unit counts.
    pub total_units: usize,
    pub scrutiny_config: ScrutinyConfig,
}

impl RoadmapEnvelope {
    /// Build and validate a roadmap.
    pub fn new(
        id: impl Into<String>,
        version: impl Into<String>,
        phases: Vec<Phase>,
        scrutiny_config: ScrutinyConfig,
    ) -> crate::errors::Result<Self> {
        let roadmap = Self::new_unchecked(id, version, phases, scrutiny_config);
        crate::roadmap::validate::validate_roadmap(&roadmap)?;
        Ok(roadmap)
    }

    /// Build a roadmap without checking unit references.
    ///
    /// `total_units` is still derived from the phases. Scheduler entry points
    /// re-check referential integrity, so an unchecked roadmap with dangling
    /// dependencies is rejected there.
    pub fn new_unchecked(
        id: impl Into<String>,
        version: impl Into<String>,
        phases: Vec<Phase>,
        scrutiny_config: ScrutinyConfig,
    ) -> Self {
        let total_units = phases.iter().map(|p| p.units.len()).sum();
        Self {
            id: id.into(),
            version: version.into(),
            phases,
            total_units,
            scrutiny_config,
        }
    }

    /// All units, flattened in declared phase order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.phases.iter().flat_map(|p| p.units.iter())
    }

    pub fn unit(&self, id: &str) -> Option<&Unit> {
        self.units().find(|u| u.id == id)
    }

    pub fn phase(&self, id: &str) -> Option<&Phase> {
        self.phases.iter().find(|p| p.id == id)
    }

    /// The phase that contains the given unit.
    pub fn phase_of_unit(&self, unit_id: &str) -> Option<&Phase> {
        self.phases
            .iter()
            .find(|p| p.units.iter().any(|u| u.id == unit_id))
    }
}
