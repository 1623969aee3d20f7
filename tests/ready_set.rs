use roadmap_sched::dag::is_ready;
use roadmap_sched::{get_ready_units, get_ready_units_in_phase};
use roadmap_sched_test_utils::completed;
use roadmap_sched_test_utils::fixtures::{cross_phase, diamond, phase, unit};

fn ids(units: &[&roadmap_sched::Unit]) -> Vec<String> {
    units.iter().map(|u| u.id.clone()).collect()
}

#[test]
fn ready_set_follows_the_diamond() {
    let roadmap = diamond();

    let ready = get_ready_units(roadmap.units(), &completed(&[]));
    assert_eq!(ids(&ready), vec!["U1"]);

    let ready = get_ready_units(roadmap.units(), &completed(&["U1"]));
    assert_eq!(ids(&ready), vec!["U2", "U3"]);

    let ready = get_ready_units(roadmap.units(), &completed(&["U1", "U2"]));
    assert_eq!(ids(&ready), vec!["U3"]);

    let ready = get_ready_units(roadmap.units(), &completed(&["U1", "U2", "U3"]));
    assert_eq!(ids(&ready), vec!["U4"]);
}

#[test]
fn completed_units_are_never_ready_again() {
    let roadmap = diamond();
    let done = completed(&["U1", "U2", "U3", "U4"]);
    assert!(get_ready_units(roadmap.units(), &done).is_empty());
    assert!(!is_ready(roadmap.unit("U1").unwrap(), &done));
}

#[test]
fn caller_completed_set_is_left_untouched() {
    let roadmap = diamond();
    let done = completed(&["U1"]);
    let before = done.clone();
    let _ = get_ready_units(roadmap.units(), &done);
    let _ = get_ready_units_in_phase(&roadmap.phases[0], &done);
    assert_eq!(done, before);
}

#[test]
fn ready_set_crosses_phase_boundaries() {
    let roadmap = cross_phase();
    let ready = get_ready_units(roadmap.units(), &completed(&["U1"]));
    assert_eq!(ids(&ready), vec!["U2", "U3", "U4"]);
}

#[test]
fn phase_ready_set_is_sorted_by_seq() {
    let p = phase(
        "P1",
        vec![unit("C", 3, &[]), unit("A", 1, &[]), unit("B", 2, &[])],
    );
    let ready = get_ready_units_in_phase(&p, &completed(&[]));
    assert_eq!(ids(&ready), vec!["A", "B", "C"]);
}

#[test]
fn phase_ready_set_only_covers_that_phase() {
    let roadmap = cross_phase();
    let ready = get_ready_units_in_phase(&roadmap.phases[1], &completed(&[]));
    assert_eq!(ids(&ready), vec!["U4"]);
}
