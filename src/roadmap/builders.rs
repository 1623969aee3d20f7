// src/roadmap/builders.rs

//! Default-valued constructors for roadmap pieces.
//!
//! JSON documents get their defaults from `serde`; these give code the same
//! zero values without spelling out every field.

use crate::errors::Result;
use crate::roadmap::model::{Phase, RoadmapEnvelope, ScrutinyConfig, Unit};

impl Unit {
    /// Empty unit: no title, `seq` 0, no dependencies, no token estimate.
    pub fn new(id: impl Into<String>, phase_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            phase_id: phase_id.into(),
            seq: 0,
            dependencies: Vec::new(),
            estimated_tokens: 0,
        }
    }
}

impl Phase {
    /// Empty phase with no units.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            units: Vec::new(),
        }
    }

    /// Append a unit, adopting it into this phase.
    pub fn with_unit(mut self, mut unit: Unit) -> Self {
        unit.phase_id = self.id.clone();
        self.units.push(unit);
        self
    }
}

/// Builder for [`Unit`].
#[derive(Debug, Clone)]
pub struct UnitBuilder {
    unit: Unit,
}

impl UnitBuilder {
    /// Start a unit; `phase_id` is set when the unit is added to a phase.
    pub fn new(id: &str) -> Self {
        Self {
            unit: Unit::new(id, ""),
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.unit.title = title.to_string();
        self
    }

    pub fn seq(mut self, seq: i64) -> Self {
        self.unit.seq = seq;
        self
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.unit.dependencies.push(dep.to_string());
        self
    }

    pub fn estimated_tokens(mut self, tokens: u64) -> Self {
        self.unit.estimated_tokens = tokens;
        self
    }

    pub fn build(self) -> Unit {
        self.unit
    }
}

/// Builder for [`Phase`]. Units added here adopt the phase id.
#[derive(Debug, Clone)]
pub struct PhaseBuilder {
    phase: Phase,
}

impl PhaseBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            phase: Phase::new(id, ""),
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.phase.title = title.to_string();
        self
    }

    pub fn unit(mut self, unit: Unit) -> Self {
        self.phase = self.phase.with_unit(unit);
        self
    }

    pub fn build(self) -> Phase {
        self.phase
    }
}

/// Builder for [`RoadmapEnvelope`].
#[derive(Debug, Clone)]
pub struct RoadmapBuilder {
    id: String,
    version: String,
    phases: Vec<Phase>,
    scrutiny_config: ScrutinyConfig,
}

impl RoadmapBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            version: "1.0".to_string(),
            phases: Vec::new(),
            scrutiny_config: ScrutinyConfig::default(),
        }
    }

    pub fn version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn phase(mut self, phase: Phase) -> Self {
        self.phases.push(phase);
        self
    }

    pub fn scrutiny_config(mut self, cfg: ScrutinyConfig) -> Self {
        self.scrutiny_config = cfg;
        self
    }

    /// Build and validate.
    pub fn build(self) -> Result<RoadmapEnvelope> {
        RoadmapEnvelope::new(self.id, self.version, self.phases, self.scrutiny_config)
    }

    /// Build without validating unit references.
    pub fn build_unchecked(self) -> RoadmapEnvelope {
        RoadmapEnvelope::new_unchecked(self.id, self.version, self.phases, self.scrutiny_config)
    }
}
