//! Cross-filter propagation tests.

use journey_core::{
    ActiveEntities, ActiveView, Filter, SortState, SortedEntities, cross_filter,
    cross_filtered_out_events, sorted_active_entities,
};
use journey_model::{Column, ColumnType, EventTable, PatientTable};

fn to_rows(raw: &[&[&str]]) -> Vec<Vec<String>> {
    raw.iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

fn patients(raw: &[&[&str]]) -> PatientTable {
    PatientTable::from_rows(&to_rows(raw), |_| {})
}

fn events(raw: &[&[&str]]) -> EventTable {
    EventTable::from_rows(&to_rows(raw), |_| {}).expect("event table")
}

fn pids(rows: &[&journey_model::Patient]) -> Vec<String> {
    rows.iter().map(|p| p.pid.as_str().to_string()).collect()
}

fn eids(rows: &[&journey_model::Event]) -> Vec<String> {
    rows.iter().map(|e| e.eid.as_str().to_string()).collect()
}

fn name_filter(text: &str) -> Filter {
    Filter::Text {
        column: Column::new("Name", ColumnType::String, 1),
        text: text.to_string(),
    }
}

fn kind_filter(text: &str) -> Filter {
    Filter::Text {
        column: Column::new("Kind", ColumnType::Category, 2),
        text: text.to_string(),
    }
}

#[test]
fn patient_filters_propagate_to_events() {
    let patients = patients(&[
        &["Id", "Name"],
        &["pid", "string"],
        &["1", "Alice"],
        &["2", "Bob"],
    ]);
    let events = events(&[
        &["Id", "Patient"],
        &["eid", "pid"],
        &["e1", "1"],
        &["e2", "2"],
    ]);

    let journey = cross_filter(&patients, &events, &[name_filter("alice")], &[]);

    assert_eq!(pids(&journey.filtered_patients), ["1"]);
    assert_eq!(eids(&journey.filtered_events), ["e1", "e2"]);
    assert_eq!(pids(&journey.cross_filtered_patients), ["1"]);
    assert_eq!(eids(&journey.cross_filtered_events), ["e1"]);
}

#[test]
fn event_filters_propagate_to_patients() {
    let patients = patients(&[
        &["Id", "Name"],
        &["pid", "string"],
        &["1", "Alice"],
        &["2", "Bob"],
    ]);
    let events = events(&[
        &["Id", "Patient", "Kind"],
        &["eid", "pid", "category"],
        &["e1", "1", "admission"],
        &["e2", "2", "discharge"],
    ]);

    let journey = cross_filter(&patients, &events, &[], &[kind_filter("admission")]);

    assert_eq!(pids(&journey.filtered_patients), ["1", "2"]);
    assert_eq!(eids(&journey.filtered_events), ["e1"]);
    assert_eq!(pids(&journey.cross_filtered_patients), ["1"]);
    assert_eq!(eids(&journey.cross_filtered_events), ["e1"]);
}

#[test]
fn patients_without_events_are_cross_filtered_out() {
    let patients = patients(&[
        &["Id", "Name"],
        &["pid", "string"],
        &["1", "Alice"],
        &["2", "Bob"],
        &["3", "Carol"],
    ]);
    let events = events(&[
        &["Id", "Patient"],
        &["eid", "pid"],
        &["e1", "1"],
        &["e2", "2"],
    ]);

    let journey = cross_filter(&patients, &events, &[], &[]);

    assert_eq!(pids(&journey.filtered_patients), ["1", "2", "3"]);
    assert_eq!(pids(&journey.cross_filtered_patients), ["1", "2"]);
    assert_eq!(eids(&journey.cross_filtered_events), ["e1", "e2"]);
}

#[test]
fn event_side_is_keyed_off_plain_filtered_patients() {
    // Bob's only event is filtered out, so Bob leaves the cross-filtered
    // patients; his remaining visibility must not cascade into a second
    // restriction of the events in the same pass.
    let patients = patients(&[
        &["Id", "Name"],
        &["pid", "string"],
        &["1", "Alice"],
        &["2", "Bob"],
    ]);
    let events = events(&[
        &["Id", "Patient", "Kind"],
        &["eid", "pid", "category"],
        &["e1", "1", "admission"],
        &["e2", "2", "discharge"],
    ]);

    let journey = cross_filter(&patients, &events, &[], &[kind_filter("admission")]);

    // e1 stays because Alice passes the (empty) patient filters, judged
    // against filtered_patients = {Alice, Bob}, not the cross set {Alice}
    assert_eq!(pids(&journey.cross_filtered_patients), ["1"]);
    assert_eq!(eids(&journey.cross_filtered_events), ["e1"]);
}

#[test]
fn disjoint_filters_empty_both_cross_views() {
    let patients = patients(&[
        &["Id", "Name"],
        &["pid", "string"],
        &["1", "Alice"],
        &["2", "Bob"],
    ]);
    let events = events(&[
        &["Id", "Patient", "Kind"],
        &["eid", "pid", "category"],
        &["e1", "1", "admission"],
        &["e2", "2", "discharge"],
    ]);

    let journey = cross_filter(
        &patients,
        &events,
        &[name_filter("alice")],
        &[kind_filter("discharge")],
    );

    assert!(journey.cross_filtered_patients.is_empty());
    assert!(journey.cross_filtered_events.is_empty());
}

#[test]
fn ghost_events_belong_to_visible_patients_only() {
    let patients = patients(&[
        &["Id", "Name"],
        &["pid", "string"],
        &["1", "Alice"],
        &["2", "Bob"],
    ]);
    let events = events(&[
        &["Id", "Patient", "Kind"],
        &["eid", "pid", "category"],
        &["e1", "1", "admission"],
        &["e2", "1", "discharge"],
        &["e3", "2", "discharge"],
    ]);

    let journey = cross_filter(&patients, &events, &[], &[kind_filter("admission")]);
    assert_eq!(pids(&journey.cross_filtered_patients), ["1"]);
    assert_eq!(eids(&journey.cross_filtered_events), ["e1"]);

    // e2 is Alice's but filtered out; e3 belongs to an invisible patient
    let ghosts = cross_filtered_out_events(&events, &journey);
    assert_eq!(eids(&ghosts), ["e2"]);
}

#[test]
fn active_view_selects_the_primary_collection() {
    let patients = patients(&[
        &["Id", "Name"],
        &["pid", "string"],
        &["1", "Alice"],
    ]);
    let events = events(&[
        &["Id", "Patient"],
        &["eid", "pid"],
        &["e1", "1"],
    ]);

    let journey = cross_filter(&patients, &events, &[], &[]);

    match journey.active_entities(ActiveView::Patients) {
        ActiveEntities::Patients(rows) => assert_eq!(pids(rows), ["1"]),
        ActiveEntities::Events(_) => panic!("expected patients"),
    }
    match journey.active_entities(ActiveView::Events) {
        ActiveEntities::Events(rows) => assert_eq!(eids(rows), ["e1"]),
        ActiveEntities::Patients(_) => panic!("expected events"),
    }
}

#[test]
fn sorted_active_view_orders_the_primary_collection() {
    let patients = patients(&[
        &["Id", "Name"],
        &["pid", "string"],
        &["1", "Zoe"],
        &["2", "Alice"],
    ]);
    let events = events(&[
        &["Id", "Patient"],
        &["eid", "pid"],
        &["e1", "1"],
        &["e2", "2"],
    ]);

    let journey = cross_filter(&patients, &events, &[], &[]);
    let state = SortState::Asc {
        column: Column::new("Name", ColumnType::String, 1),
    };

    match sorted_active_entities(&journey, ActiveView::Patients, &state) {
        SortedEntities::Patients(rows) => assert_eq!(pids(&rows), ["2", "1"]),
        SortedEntities::Events(_) => panic!("expected patients"),
    }
}

#[test]
fn dangling_event_references_never_match() {
    let patients = patients(&[
        &["Id", "Name"],
        &["pid", "string"],
        &["1", "Alice"],
    ]);
    let events = events(&[
        &["Id", "Patient"],
        &["eid", "pid"],
        &["e1", "1"],
        &["e2", "unknown"],
    ]);

    let journey = cross_filter(&patients, &events, &[], &[]);
    assert_eq!(eids(&journey.cross_filtered_events), ["e1"]);
}
