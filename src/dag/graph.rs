// src/dag/graph.rs

use std::collections::HashMap;

use crate::errors::{Result, SchedulerError};
use crate::roadmap::RoadmapEnvelope;
use crate::types::UnitId;

/// Internal node structure: immediate deps and dependents as dense indices.
#[derive(Debug, Clone)]
struct UnitNode {
    id: UnitId,
    phase_index: usize,
    seq: i64,
    /// Direct dependencies: units that must complete before this one.
    deps: Vec<usize>,
    /// Direct dependents: units that list this one in `dependencies`.
    dependents: Vec<usize>,
}

/// Index-based view of the roadmap's unit graph.
///
/// Every unit id is resolved to a dense index exactly once, so traversals
/// work on slices instead of string lookups. Construction is where
/// referential integrity is enforced: duplicate unit ids and dependencies on
/// unknown units are rejected with [`SchedulerError::Configuration`].
///
/// Node indices follow declaration order (phase by phase, unit by unit).
#[derive(Debug, Clone)]
pub struct UnitGraph {
    nodes: Vec<UnitNode>,
    index: HashMap<UnitId, usize>,
}

impl UnitGraph {
    pub fn from_roadmap(roadmap: &RoadmapEnvelope) -> Result<Self> {
        let mut nodes: Vec<UnitNode> = Vec::with_capacity(roadmap.total_units);
        let mut index: HashMap<UnitId, usize> = HashMap::with_capacity(roadmap.total_units);

        // First pass: assign indices, rejecting duplicates.
        for (phase_index, phase) in roadmap.phases.iter().enumerate() {
            for unit in phase.units.iter() {
                if index.contains_key(&unit.id) {
                    return Err(SchedulerError::Configuration(format!(
                        "duplicate unit id '{}' (second occurrence in phase '{}')",
                        unit.id, phase.id
                    )));
                }
                index.insert(unit.id.clone(), nodes.len());
                nodes.push(UnitNode {
                    id: unit.id.clone(),
                    phase_index,
                    seq: unit.seq,
                    deps: Vec::new(),
                    dependents: Vec::new(),
                });
            }
        }

        // Second pass: resolve dependency ids.
        for (idx, unit) in roadmap.units().enumerate() {
            let mut deps = Vec::with_capacity(unit.dependencies.len());
            for dep in unit.dependencies.iter() {
                let Some(&dep_idx) = index.get(dep) else {
                    return Err(SchedulerError::Configuration(format!(
                        "unit '{}' has unknown dependency '{}'",
                        unit.id, dep
                    )));
                };
                if !deps.contains(&dep_idx) {
                    deps.push(dep_idx);
                }
            }
            nodes[idx].deps = deps;
        }

        // Third pass: populate dependents based on deps.
        for idx in 0..nodes.len() {
            let deps = nodes[idx].deps.clone();
            for dep in deps {
                nodes[dep].dependents.push(idx);
            }
        }

        Ok(Self { nodes, index })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn id(&self, idx: usize) -> &str {
        &self.nodes[idx].id
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Immediate dependencies of a unit.
    pub fn dependencies(&self, idx: usize) -> &[usize] {
        &self.nodes[idx].deps
    }

    /// Immediate dependents of a unit.
    pub fn dependents(&self, idx: usize) -> &[usize] {
        &self.nodes[idx].dependents
    }

    pub fn phase_index(&self, idx: usize) -> usize {
        self.nodes[idx].phase_index
    }

    /// Deterministic ordering key: `(phase position, unit seq, declaration index)`.
    pub fn order_key(&self, idx: usize) -> (usize, i64, usize) {
        let node = &self.nodes[idx];
        (node.phase_index, node.seq, idx)
    }

    /// Sort indices in place by [`order_key`](Self::order_key).
    pub fn sort_canonical(&self, indices: &mut [usize]) {
        indices.sort_by_key(|&i| self.order_key(i));
    }

    /// Map indices back to ids.
    pub fn ids_of(&self, indices: &[usize]) -> Vec<UnitId> {
        indices.iter().map(|&i| self.nodes[i].id.clone()).collect()
    }
}
