// src/config/mod.rs

//! Scheduler settings (`RoadmapSched.toml`).
//!
//! ```toml
//! [gate]
//! omega_floor = 0.7
//! ```

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{DEFAULT_OMEGA_FLOOR, GateConfig, RawSchedulerConfig, SchedulerConfig};
