use chrono::{TimeZone, Utc};
use roadmap_sched::engine::advance_position_at;
use roadmap_sched::errors::SchedulerError;
use roadmap_sched::types::PositionStatus;
use roadmap_sched::{
    ExecutionPosition, UnitCompletion, advance_position, create_initial_position,
    get_completed_ids,
};
use roadmap_sched_test_utils::completed;
use roadmap_sched_test_utils::fixtures::{chain, cross_phase, cyclic, diamond, single_phase, unit};
use roadmap_sched_test_utils::init_tracing;

#[test]
fn initial_position_points_at_first_root() {
    let pos = create_initial_position(&diamond()).unwrap();

    assert_eq!(pos.roadmap_id, "test-roadmap");
    assert_eq!(pos.current_unit.as_deref(), Some("U1"));
    assert_eq!(pos.current_phase.as_deref(), Some("P1"));
    assert_eq!(pos.units_completed, 0);
    assert_eq!(pos.total_units, 4);
    assert_eq!(pos.percent_complete, 0);
    assert_eq!(pos.status, PositionStatus::InProgress);
    assert!(pos.last_completed_unit.is_none());
    assert!(pos.history.is_empty());
}

#[test]
fn initial_position_prefers_lowest_seq_root() {
    let roadmap = single_phase(vec![unit("B", 5, &[]), unit("A", 1, &[])]);
    let pos = create_initial_position(&roadmap).unwrap();
    assert_eq!(pos.current_unit.as_deref(), Some("A"));
}

#[test]
fn initial_position_refuses_cycles() {
    assert!(matches!(
        create_initial_position(&cyclic()),
        Err(SchedulerError::CyclicDependency { .. })
    ));
}

#[test]
fn advancing_returns_a_new_position_and_leaves_the_old_one_alone() {
    init_tracing();
    let roadmap = diamond();
    let pos = create_initial_position(&roadmap).unwrap();
    let snapshot = pos.clone();

    let next = advance_position(&pos, &[UnitCompletion::passed("U1")], &roadmap).unwrap();

    assert_eq!(pos, snapshot);
    assert_eq!(next.units_completed, 1);
    assert_eq!(next.percent_complete, 25);
    assert_eq!(next.current_unit.as_deref(), Some("U2"));
    assert_eq!(next.last_completed_unit.as_deref(), Some("U1"));
    assert_eq!(next.history.len(), 1);
    assert_eq!(next.history[0].unit_id, "U1");
}

#[test]
fn failed_build_is_recorded_but_still_credited() {
    let roadmap = chain();
    let pos = create_initial_position(&roadmap).unwrap();
    let next = advance_position(&pos, &[UnitCompletion::new("U1", false)], &roadmap).unwrap();

    assert_eq!(next.units_completed, 1);
    assert!(!next.history[0].build_status);
    assert_eq!(next.current_unit.as_deref(), Some("U2"));
}

#[test]
fn completing_a_unit_before_its_dependencies_is_rejected() {
    let roadmap = diamond();
    let pos = create_initial_position(&roadmap).unwrap();

    match advance_position(&pos, &[UnitCompletion::passed("U4")], &roadmap) {
        Err(SchedulerError::OutOfOrderAdvancement { unit, missing }) => {
            assert_eq!(unit, "U4");
            assert_eq!(missing, vec!["U2", "U3"]);
        }
        other => panic!("expected OutOfOrderAdvancement, got {other:?}"),
    }
}

#[test]
fn rejected_call_credits_nothing() {
    let roadmap = chain();
    let pos = create_initial_position(&roadmap).unwrap();

    let result = advance_position(
        &pos,
        &[UnitCompletion::passed("U1"), UnitCompletion::passed("U3")],
        &roadmap,
    );
    assert!(matches!(result, Err(SchedulerError::OutOfOrderAdvancement { .. })));
    assert!(pos.history.is_empty());
}

#[test]
fn ordered_completions_in_one_call_are_credited_in_sequence() {
    let roadmap = chain();
    let pos = create_initial_position(&roadmap).unwrap();

    let done = advance_position(
        &pos,
        &[
            UnitCompletion::passed("U1"),
            UnitCompletion::passed("U2"),
            UnitCompletion::passed("U3"),
        ],
        &roadmap,
    )
    .unwrap();

    assert_eq!(done.status, PositionStatus::Complete);
    assert_eq!(done.percent_complete, 100);
    assert_eq!(done.units_completed, 3);
    assert!(done.current_unit.is_none());
    assert_eq!(done.last_completed_unit.as_deref(), Some("U3"));
}

#[test]
fn partial_batch_completion_is_accounted_for() {
    let roadmap = diamond();
    let pos = create_initial_position(&roadmap).unwrap();
    let pos = advance_position(&pos, &[UnitCompletion::passed("U1")], &roadmap).unwrap();

    // Batch [U2, U3] dispatched, only U3 came back.
    let pos = advance_position(&pos, &[UnitCompletion::passed("U3")], &roadmap).unwrap();
    assert_eq!(pos.units_completed, 2);
    assert_eq!(pos.percent_complete, 50);
    assert_eq!(pos.current_unit.as_deref(), Some("U2"));
    assert_eq!(pos.remaining(&roadmap), vec!["U2", "U4"]);
}

#[test]
fn percent_is_rounded() {
    let roadmap = chain();
    let pos = create_initial_position(&roadmap).unwrap();
    let pos = advance_position(&pos, &[UnitCompletion::passed("U1")], &roadmap).unwrap();
    assert_eq!(pos.percent_complete, 33);
    let pos = advance_position(&pos, &[UnitCompletion::passed("U2")], &roadmap).unwrap();
    assert_eq!(pos.percent_complete, 67);
}

#[test]
fn complete_status_never_reverts_and_history_keeps_growing() {
    let roadmap = diamond();
    let mut pos = create_initial_position(&roadmap).unwrap();
    let mut seen_complete = 0;

    for step in [vec!["U1"], vec!["U2", "U3"], vec!["U4"], vec!["U4"]] {
        let completions: Vec<UnitCompletion> =
            step.iter().map(|id| UnitCompletion::passed(*id)).collect();
        let next = advance_position(&pos, &completions, &roadmap).unwrap();

        assert!(next.units_completed >= pos.units_completed);
        assert!(next.history.len() > pos.history.len());
        assert!(next.percent_complete <= 100);
        if pos.status == PositionStatus::Complete {
            assert_eq!(next.status, PositionStatus::Complete);
        }
        if next.status == PositionStatus::Complete && pos.status == PositionStatus::InProgress {
            seen_complete += 1;
            assert_eq!(next.units_completed, roadmap.total_units);
        }
        pos = next;
    }

    assert_eq!(seen_complete, 1);
    assert_eq!(pos.units_completed, 4);
    assert_eq!(pos.history.len(), 5);
}

#[test]
fn completions_are_timestamped() {
    let roadmap = chain();
    let pos = create_initial_position(&roadmap).unwrap();
    let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();

    let next = advance_position_at(&pos, &[UnitCompletion::passed("U1")], &roadmap, at).unwrap();
    assert_eq!(next.history[0].completed_at, at);
}

#[test]
fn unknown_unit_is_a_configuration_error() {
    let roadmap = chain();
    let pos = create_initial_position(&roadmap).unwrap();
    assert!(matches!(
        advance_position(&pos, &[UnitCompletion::passed("NOPE")], &roadmap),
        Err(SchedulerError::Configuration(_))
    ));
}

#[test]
fn position_from_another_roadmap_is_rejected() {
    let pos = create_initial_position(&cross_phase()).unwrap();
    assert!(matches!(
        advance_position(&pos, &[UnitCompletion::passed("U1")], &chain()),
        Err(SchedulerError::Configuration(_))
    ));

    let mut renamed = cross_phase();
    renamed.id = "renamed".to_string();
    assert!(matches!(
        advance_position(&pos, &[UnitCompletion::passed("U1")], &renamed),
        Err(SchedulerError::Configuration(_))
    ));
}

#[test]
fn completed_ids_derive_from_history() {
    let roadmap = cross_phase();
    let pos = create_initial_position(&roadmap).unwrap();
    let pos = advance_position(
        &pos,
        &[UnitCompletion::passed("U1"), UnitCompletion::passed("U4")],
        &roadmap,
    )
    .unwrap();

    assert_eq!(get_completed_ids(&pos), completed(&["U1", "U4"]));
    assert_eq!(pos.current_unit.as_deref(), Some("U2"));
    assert_eq!(pos.current_phase.as_deref(), Some("P1"));
}

#[test]
fn persisted_position_resumes_identically() {
    let roadmap = diamond();
    let pos = create_initial_position(&roadmap).unwrap();
    let pos = advance_position(&pos, &[UnitCompletion::passed("U1")], &roadmap).unwrap();

    let stored = serde_json::to_string(&pos).unwrap();
    assert!(stored.contains("\"IN_PROGRESS\""));
    let restored: ExecutionPosition = serde_json::from_str(&stored).unwrap();
    assert_eq!(restored, pos);

    let a = advance_position(&restored, &[UnitCompletion::passed("U2")], &roadmap).unwrap();
    assert_eq!(a.units_completed, 2);
    assert_eq!(a.to_string(), "IN_PROGRESS 2/4 (50%) current=U3 [P1]");
}
