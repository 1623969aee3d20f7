// src/dag/layers.rs

//! Topological layering of the unit graph.

use std::collections::HashSet;

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dag::graph::UnitGraph;
use crate::errors::{Result, SchedulerError};
use crate::roadmap::RoadmapEnvelope;
use crate::types::UnitId;

/// Read-only layered view of a roadmap's dependency graph.
///
/// Layer 0 holds every unit without dependencies; layer `i` holds the units
/// whose dependencies all sit in layers `0..i`. Within a layer, ids are
/// ordered by `(phase position, unit seq)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyDag {
    pub total_units: usize,
    pub has_cycles: bool,
    /// Human-readable cycle report; only set when `has_cycles`.
    pub cycle_info: Option<String>,
    /// Empty when `has_cycles`.
    pub layers: Vec<Vec<UnitId>>,
    /// Units that could not be layered (cycle members and everything
    /// downstream of them).
    #[serde(default)]
    pub unresolved: Vec<UnitId>,
}

impl DependencyDag {
    /// Refuse to continue with a cyclic graph.
    pub fn ensure_acyclic(&self) -> Result<()> {
        if self.has_cycles {
            return Err(SchedulerError::CyclicDependency {
                units: self.unresolved.clone(),
                detail: self.cycle_info.clone().unwrap_or_default(),
            });
        }
        Ok(())
    }

    /// Index of the layer that contains `id`.
    pub fn layer_of(&self, id: &str) -> Option<usize> {
        self.layers
            .iter()
            .position(|layer| layer.iter().any(|u| u == id))
    }
}

/// Build the layered dependency view of a roadmap.
///
/// Fails with `Configuration` for duplicate ids or unknown dependencies,
/// before any layering is attempted. A cycle is not an error at this point:
/// it is reported through `has_cycles` / `cycle_info` so callers can inspect
/// it; use [`DependencyDag::ensure_acyclic`] to turn it into one.
pub fn build_dependency_dag(roadmap: &RoadmapEnvelope) -> Result<DependencyDag> {
    let graph = UnitGraph::from_roadmap(roadmap)?;
    Ok(layer_graph(&graph))
}

/// Kahn-style layering over an already resolved graph.
pub(crate) fn layer_graph(graph: &UnitGraph) -> DependencyDag {
    let n = graph.len();
    let mut in_degree: Vec<usize> = (0..n).map(|i| graph.dependencies(i).len()).collect();
    let mut assigned = vec![false; n];

    let mut current: Vec<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    graph.sort_canonical(&mut current);

    let mut layers: Vec<Vec<UnitId>> = Vec::new();

    while !current.is_empty() {
        let mut next = Vec::new();
        for &idx in current.iter() {
            assigned[idx] = true;
            for &dependent in graph.dependents(idx) {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    next.push(dependent);
                }
            }
        }
        graph.sort_canonical(&mut next);

        debug!(
            layer = layers.len(),
            units = current.len(),
            "dag: layer resolved"
        );
        layers.push(graph.ids_of(&current));
        current = next;
    }

    let mut remaining: Vec<usize> = (0..n).filter(|&i| !assigned[i]).collect();
    if remaining.is_empty() {
        return DependencyDag {
            total_units: n,
            has_cycles: false,
            cycle_info: None,
            layers,
            unresolved: Vec::new(),
        };
    }

    graph.sort_canonical(&mut remaining);
    let cycles = find_cycles(graph, &remaining);
    let unresolved = graph.ids_of(&remaining);
    let cycle_info = format!(
        "unresolved units [{}]; {}",
        unresolved.join(", "),
        cycles
            .iter()
            .map(|c| format!("cycle: {c}"))
            .collect::<Vec<_>>()
            .join("; ")
    );

    warn!(
        unresolved = unresolved.len(),
        %cycle_info,
        "dag: dependency cycle detected"
    );

    DependencyDag {
        total_units: n,
        has_cycles: true,
        cycle_info: Some(cycle_info),
        layers: Vec::new(),
        unresolved,
    }
}

/// Find the concrete cycles among the unlayered units.
///
/// Strongly connected components with more than one member (or a self edge)
/// are cycles; each is rendered as a closed path like `U1 -> U2 -> U1`.
fn find_cycles(graph: &UnitGraph, remaining: &[usize]) -> Vec<String> {
    let members: HashSet<usize> = remaining.iter().copied().collect();

    // Edge direction: dep -> unit.
    let mut sub: DiGraphMap<usize, ()> = DiGraphMap::new();
    for &idx in remaining {
        sub.add_node(idx);
    }
    for &idx in remaining {
        for &dep in graph.dependencies(idx) {
            if members.contains(&dep) {
                sub.add_edge(dep, idx, ());
            }
        }
    }

    let mut components: Vec<Vec<usize>> = tarjan_scc(&sub)
        .into_iter()
        .filter(|scc| scc.len() > 1 || sub.contains_edge(scc[0], scc[0]))
        .map(|mut scc| {
            graph.sort_canonical(&mut scc);
            scc
        })
        .collect();
    components.sort_by_key(|scc| graph.order_key(scc[0]));

    components
        .iter()
        .map(|scc| {
            let path = cycle_path(&sub, scc);
            path.iter()
                .map(|&i| graph.id(i))
                .collect::<Vec<_>>()
                .join(" -> ")
        })
        .collect()
}

/// Depth-first search inside one strongly connected component for a path
/// from its first member back to itself.
fn cycle_path(sub: &DiGraphMap<usize, ()>, scc: &[usize]) -> Vec<usize> {
    let start = scc[0];
    let allowed: HashSet<usize> = scc.iter().copied().collect();

    let mut path = vec![start];
    let mut visited: HashSet<usize> = HashSet::from([start]);
    // Each frame holds the node's remaining neighbours.
    let mut stack: Vec<Vec<usize>> = vec![neighbours(sub, start, &allowed)];

    while let Some(frame) = stack.last_mut() {
        let Some(next) = frame.pop() else {
            stack.pop();
            path.pop();
            continue;
        };
        if next == start {
            path.push(start);
            return path;
        }
        if visited.insert(next) {
            path.push(next);
            stack.push(neighbours(sub, next, &allowed));
        }
    }

    // An SCC always contains a cycle through any member; fall back to listing it.
    let mut fallback = scc.to_vec();
    fallback.push(start);
    fallback
}

fn neighbours(sub: &DiGraphMap<usize, ()>, node: usize, allowed: &HashSet<usize>) -> Vec<usize> {
    let mut out: Vec<usize> = sub
        .neighbors(node)
        .filter(|n| allowed.contains(n))
        .collect();
    // Reverse so that `pop` visits the lowest index first.
    out.sort_unstable_by(|a, b| b.cmp(a));
    out
}
