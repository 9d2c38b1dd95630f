//! Cross-filter propagation between the patient and event tables.
//!
//! Patients and events mutually constrain each other through the pid
//! foreign key: filters on either table restrict both tables' visible
//! rows, without the two filter sets knowing about each other.
//!
//! Propagation is a fixed two-step pass over immutable snapshots, not a
//! fixed-point iteration: the event side is keyed off the plain filtered
//! patients, never the cross-filtered set, so one pass always terminates.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use journey_model::{EntityId, Event, EventTable, Patient, PatientId, PatientTable};

use crate::filtering::{Filter, apply_filters};
use crate::sorting::{SortState, stable_sort};

/// Which of the two tables is the primary one driving table and timeline
/// display. The other stays available for counterpart histograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveView {
    Patients,
    Events,
}

/// The four derived views every visual component renders from. All four
/// are views over the input tables' rows, in import order.
#[derive(Debug, Clone)]
pub struct CrossFilteredJourney<'a> {
    /// Patients surviving the patient-side filters.
    pub filtered_patients: Vec<&'a Patient>,
    /// Events surviving the event-side filters.
    pub filtered_events: Vec<&'a Event>,
    /// Filtered patients referenced by at least one filtered event.
    pub cross_filtered_patients: Vec<&'a Patient>,
    /// Filtered events whose patient survived the patient-side filters.
    pub cross_filtered_events: Vec<&'a Event>,
}

impl<'a> CrossFilteredJourney<'a> {
    /// The primary on-screen collection for the given view.
    pub fn active_entities(&self, view: ActiveView) -> ActiveEntities<'_, 'a> {
        match view {
            ActiveView::Patients => ActiveEntities::Patients(&self.cross_filtered_patients),
            ActiveView::Events => ActiveEntities::Events(&self.cross_filtered_events),
        }
    }
}

/// The cross-filtered collection selected by an [`ActiveView`].
#[derive(Debug, Clone, Copy)]
pub enum ActiveEntities<'v, 'a> {
    Patients(&'v [&'a Patient]),
    Events(&'v [&'a Event]),
}

/// A sorted view of the active collection.
#[derive(Debug, Clone)]
pub enum SortedEntities<'a> {
    Patients(Vec<&'a Patient>),
    Events(Vec<&'a Event>),
}

/// The primary collection for `view`, sorted by `state`.
pub fn sorted_active_entities<'a>(
    journey: &CrossFilteredJourney<'a>,
    view: ActiveView,
    state: &SortState,
) -> SortedEntities<'a> {
    match journey.active_entities(view) {
        ActiveEntities::Patients(rows) => SortedEntities::Patients(stable_sort(rows, state)),
        ActiveEntities::Events(rows) => SortedEntities::Events(stable_sort(rows, state)),
    }
}

/// Compute the four derived views from the full tables and the two
/// per-table filter lists.
pub fn cross_filter<'a>(
    patients: &'a PatientTable,
    events: &'a EventTable,
    patient_filters: &[Filter],
    event_filters: &[Filter],
) -> CrossFilteredJourney<'a> {
    let filtered_patients = apply_filters(&patients.entities, patient_filters);
    let filtered_events = apply_filters(&events.entities, event_filters);

    let filtered_event_pids: HashSet<&PatientId> =
        filtered_events.iter().map(|event| &event.pid).collect();
    let cross_filtered_patients: Vec<&Patient> = filtered_patients
        .iter()
        .copied()
        .filter(|patient| filtered_event_pids.contains(&patient.pid))
        .collect();

    // Keyed off the pre-cross filtered patients: a patient visible only
    // because of event filters must not restrict events in the same pass.
    let filtered_patient_pids: HashSet<&PatientId> =
        filtered_patients.iter().map(|patient| &patient.pid).collect();
    let cross_filtered_events: Vec<&Event> = filtered_events
        .iter()
        .copied()
        .filter(|event| filtered_patient_pids.contains(&event.pid))
        .collect();

    debug!(
        patients = patients.entities.len(),
        events = events.entities.len(),
        cross_filtered_patients = cross_filtered_patients.len(),
        cross_filtered_events = cross_filtered_events.len(),
        "cross-filter pass"
    );

    CrossFilteredJourney {
        filtered_patients,
        filtered_events,
        cross_filtered_patients,
        cross_filtered_events,
    }
}

/// Events of a cross-filtered-in patient that the event filters excluded.
///
/// Rendered as greyed-out "ghost" marks on the timeline; derived from the
/// same snapshots as the journey itself.
pub fn cross_filtered_out_events<'a>(
    events: &'a EventTable,
    journey: &CrossFilteredJourney<'_>,
) -> Vec<&'a Event> {
    let visible_pids: HashSet<&PatientId> = journey
        .cross_filtered_patients
        .iter()
        .map(|patient| &patient.pid)
        .collect();
    let visible_uids: HashSet<&EntityId> = journey
        .cross_filtered_events
        .iter()
        .map(|event| &event.uid)
        .collect();

    events
        .entities
        .iter()
        .filter(|event| visible_pids.contains(&event.pid) && !visible_uids.contains(&event.uid))
        .collect()
}
