use std::collections::{BTreeMap, HashSet};

use proptest::prelude::*;
use roadmap_sched::roadmap::{Phase, RoadmapBuilder, RoadmapEnvelope, UnitBuilder};
use roadmap_sched::types::PositionStatus;
use roadmap_sched::{
    UnitCompletion, advance_position, build_dependency_dag, create_initial_position,
    get_completed_ids, get_next_batch, plan_roadmap_execution, validate_batch,
};

// Acyclic by construction: unit N may only depend on units 0..N-1. Units are
// scattered over up to three phases, so edges freely cross phase boundaries.
fn roadmap_strategy(max_units: usize) -> impl Strategy<Value = RoadmapEnvelope> {
    (1..=max_units).prop_flat_map(|num_units| {
        let deps = proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..3),
            num_units,
        );
        let phases = proptest::collection::vec(0..3usize, num_units);

        (deps, phases).prop_map(move |(raw_deps, phase_of)| {
            let mut phases: BTreeMap<usize, Phase> = BTreeMap::new();
            for (i, potential) in raw_deps.into_iter().enumerate() {
                let mut builder = UnitBuilder::new(&format!("u{i}")).seq(i as i64);
                let valid: HashSet<usize> = if i == 0 {
                    HashSet::new()
                } else {
                    potential.into_iter().map(|d| d % i).collect()
                };
                let mut valid: Vec<usize> = valid.into_iter().collect();
                valid.sort_unstable();
                for d in valid {
                    builder = builder.after(&format!("u{d}"));
                }

                let p = phase_of[i];
                let phase = phases
                    .remove(&p)
                    .unwrap_or_else(|| Phase::new(format!("P{p}"), format!("Phase {p}")));
                phases.insert(p, phase.with_unit(builder.build()));
            }

            phases
                .into_values()
                .fold(RoadmapBuilder::new("prop"), |b, p| b.phase(p))
                .build()
                .expect("generated roadmap must be valid")
        })
    })
}

proptest! {
    #[test]
    fn layers_are_a_topological_partition(roadmap in roadmap_strategy(12)) {
        let dag = build_dependency_dag(&roadmap).unwrap();
        prop_assert!(!dag.has_cycles);

        let flattened: Vec<&String> = dag.layers.iter().flatten().collect();
        let unique: HashSet<&String> = flattened.iter().copied().collect();
        prop_assert_eq!(flattened.len(), roadmap.total_units);
        prop_assert_eq!(unique.len(), roadmap.total_units);

        for unit in roadmap.units() {
            let own = dag.layer_of(&unit.id).unwrap();
            for dep in unit.dependencies.iter() {
                prop_assert!(dag.layer_of(dep).unwrap() < own);
            }
        }
    }

    #[test]
    fn planned_batches_are_independent(roadmap in roadmap_strategy(12)) {
        let plan = plan_roadmap_execution(&roadmap).unwrap();
        let mut accounted = 0;
        for phase in plan.phases.iter() {
            accounted += phase.total_units + phase.blocked.len();
            for batch in phase.batches.iter() {
                prop_assert_eq!(batch.parallel, batch.len() > 1);
                let conflicts = validate_batch(&batch.units, &HashSet::new()).conflicts;
                prop_assert!(conflicts.is_empty(), "conflicts: {:?}", conflicts);
            }
        }
        prop_assert_eq!(accounted, roadmap.total_units);
    }

    #[test]
    fn dispatch_loop_progresses_monotonically(
        roadmap in roadmap_strategy(12),
        takes in proptest::collection::vec(any::<usize>(), 64),
    ) {
        let mut pos = create_initial_position(&roadmap).unwrap();
        let mut steps = 0;

        loop {
            let next = get_next_batch(&roadmap, &pos).unwrap();
            if next.complete {
                break;
            }
            let batch = next.batch.unwrap();
            let done = get_completed_ids(&pos);
            for unit in batch.units.iter() {
                for dep in unit.dependencies.iter() {
                    prop_assert!(done.contains(dep), "{} dispatched before {}", unit.id, dep);
                }
            }

            // Only a prefix of the batch finishes this round.
            let take = 1 + takes[steps % takes.len()] % batch.len();
            let completions: Vec<UnitCompletion> = batch
                .units
                .iter()
                .take(take)
                .map(|u| UnitCompletion::passed(u.id.clone()))
                .collect();

            let advanced = advance_position(&pos, &completions, &roadmap).unwrap();
            prop_assert!(advanced.units_completed > pos.units_completed);
            prop_assert!(advanced.percent_complete <= 100);
            prop_assert!(advanced.history.len() >= pos.history.len());
            if pos.status == PositionStatus::Complete {
                prop_assert_eq!(advanced.status, PositionStatus::Complete);
            }
            pos = advanced;

            steps += 1;
            prop_assert!(steps <= roadmap.total_units, "dispatch loop did not terminate");
        }

        prop_assert_eq!(pos.status, PositionStatus::Complete);
        prop_assert_eq!(pos.units_completed, roadmap.total_units);
        prop_assert_eq!(pos.percent_complete, 100);
    }
}
