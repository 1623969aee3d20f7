// src/roadmap/mod.rs

//! Roadmap document model.
//!
//! - [`model`] holds the typed `Unit` / `Phase` / `RoadmapEnvelope` shapes.
//! - [`builders`] provides default-valued constructors for assembling
//!   roadmaps in code.
//! - [`validate`] turns a deserialised [`RawRoadmap`] into a checked
//!   [`RoadmapEnvelope`].
//! - [`loader`] reads roadmap JSON from strings or files.

pub mod builders;
pub mod loader;
pub mod model;
pub mod validate;

pub use builders::{PhaseBuilder, RoadmapBuilder, UnitBuilder};
pub use loader::{from_json_str, load_and_validate, load_from_path};
pub use model::{Phase, RawRoadmap, RoadmapEnvelope, ScrutinyConfig, Unit};
pub use validate::validate_roadmap;
