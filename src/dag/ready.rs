// src/dag/ready.rs

//! Ready-set resolution.
//!
//! A unit is *ready* when it is not yet completed and every one of its
//! dependencies is. These functions are pure filters: they never touch the
//! caller's completed set.

use std::collections::HashSet;

use crate::roadmap::{Phase, Unit};
use crate::types::UnitId;

/// Set of unit ids credited as completed.
pub type CompletedSet = HashSet<UnitId>;

/// Whether a single unit is ready given `completed`.
pub fn is_ready(unit: &Unit, completed: &CompletedSet) -> bool {
    !completed.contains(&unit.id)
        && unit
            .dependencies
            .iter()
            .all(|dep| completed.contains(dep))
}

/// All ready units among `units`, in the order they were given.
pub fn get_ready_units<'a, I>(units: I, completed: &CompletedSet) -> Vec<&'a Unit>
where
    I: IntoIterator<Item = &'a Unit>,
{
    units
        .into_iter()
        .filter(|unit| is_ready(unit, completed))
        .collect()
}

/// Ready units of a single phase, ordered by `seq` (declaration order breaks
/// ties).
pub fn get_ready_units_in_phase<'a>(phase: &'a Phase, completed: &CompletedSet) -> Vec<&'a Unit> {
    let mut ready = get_ready_units(phase.units.iter(), completed);
    ready.sort_by_key(|unit| unit.seq);
    ready
}
