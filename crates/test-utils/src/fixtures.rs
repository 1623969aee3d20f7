#![allow(dead_code)]

//! Small roadmaps shared by the integration tests.

use roadmap_sched::Unit;
use roadmap_sched::roadmap::{Phase, PhaseBuilder, RoadmapBuilder, RoadmapEnvelope, UnitBuilder};

/// Unit with `seq` and dependencies in one call.
pub fn unit(id: &str, seq: i64, deps: &[&str]) -> Unit {
    deps.iter()
        .fold(UnitBuilder::new(id).title(id).seq(seq), |b, d| b.after(d))
        .build()
}

/// Phase adopting the given units.
pub fn phase(id: &str, units: Vec<Unit>) -> Phase {
    units
        .into_iter()
        .fold(PhaseBuilder::new(id).title(&format!("Phase {id}")), |p, u| p.unit(u))
        .build()
}

/// Single-phase roadmap.
pub fn single_phase(units: Vec<Unit>) -> RoadmapEnvelope {
    RoadmapBuilder::new("test-roadmap")
        .phase(phase("P1", units))
        .build()
        .expect("valid fixture roadmap")
}

/// U1, U2, U3 with no edges.
pub fn independent() -> RoadmapEnvelope {
    single_phase(vec![unit("U1", 1, &[]), unit("U2", 2, &[]), unit("U3", 3, &[])])
}

/// U1 -> U2 -> U3.
pub fn chain() -> RoadmapEnvelope {
    single_phase(vec![
        unit("U1", 1, &[]),
        unit("U2", 2, &["U1"]),
        unit("U3", 3, &["U2"]),
    ])
}

/// U1 -> {U2, U3} -> U4.
pub fn diamond() -> RoadmapEnvelope {
    single_phase(vec![
        unit("U1", 1, &[]),
        unit("U2", 2, &["U1"]),
        unit("U3", 3, &["U1"]),
        unit("U4", 4, &["U2", "U3"]),
    ])
}

/// P1 = [U1, U2(dep U1)], P2 = [U3(dep U1), U4].
pub fn cross_phase() -> RoadmapEnvelope {
    RoadmapBuilder::new("cross-phase")
        .phase(phase("P1", vec![unit("U1", 1, &[]), unit("U2", 2, &["U1"])]))
        .phase(phase("P2", vec![unit("U3", 1, &["U1"]), unit("U4", 2, &[])]))
        .build()
        .expect("valid fixture roadmap")
}

/// U1 -> U2 -> U1, plus U3 downstream of the cycle and independent U0.
pub fn cyclic() -> RoadmapEnvelope {
    RoadmapBuilder::new("cyclic")
        .phase(phase(
            "P1",
            vec![
                unit("U0", 0, &[]),
                unit("U1", 1, &["U2"]),
                unit("U2", 2, &["U1"]),
                unit("U3", 3, &["U2"]),
            ],
        ))
        .build()
        .expect("cycles are not a validation error")
}
