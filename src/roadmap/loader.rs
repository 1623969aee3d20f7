// src/roadmap/loader.rs

use std::fs;
use std::path::Path;

use crate::errors::Result;
use crate::roadmap::model::{RawRoadmap, RoadmapEnvelope};

/// Read a roadmap JSON file and return the raw, unvalidated document.
///
/// Use [`load_and_validate`] unless you need to inspect an invalid roadmap.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawRoadmap> {
    let contents = fs::read_to_string(path.as_ref())?;
    let raw: RawRoadmap = serde_json::from_str(&contents)?;
    Ok(raw)
}

/// Read a roadmap JSON file and validate it.
///
/// Fails with `Configuration` for duplicate ids, dangling dependencies or
/// inconsistent counters. Cycles are accepted here and surface later when the
/// DAG is built.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<RoadmapEnvelope> {
    let raw = load_from_path(path)?;
    RoadmapEnvelope::try_from(raw)
}

/// Parse and validate a roadmap from a JSON string.
pub fn from_json_str(json: &str) -> Result<RoadmapEnvelope> {
    let raw: RawRoadmap = serde_json::from_str(json)?;
    RoadmapEnvelope::try_from(raw)
}
