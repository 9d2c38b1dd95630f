//! Referential and format integrity checks over the raw tables.
//!
//! All checks are advisory: duplicates and dangling references are
//! reported and the data is used as-is. The filter and sort passes stay
//! individually safe even when a check was never run.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use journey_model::{Column, ColumnType, Entity, EventTable, HEADER_ROW_COUNT, PatientTable};

static DATE_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}\.\d{2}\.\d{4}$").expect("date format pattern"));

/// Issue severity. Errors mark data the UI cannot present faithfully;
/// warnings mark data that merely behaves surprisingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Warning,
    Error,
}

/// A single consistency finding.
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
}

/// All findings of one consistency run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConsistencyReport {
    pub issues: Vec<Issue>,
}

impl ConsistencyReport {
    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Warning)
            .count()
    }
}

/// Run every check, reporting through the callbacks.
///
/// Checks, in order: duplicate patient ids, duplicate event ids, dangling
/// event pid references (all warnings), then malformed `date` cells in
/// either table (errors, first offending value per table).
pub fn check_consistency_with(
    patients: &PatientTable,
    events: &EventTable,
    mut on_warning: impl FnMut(String),
    mut on_error: impl FnMut(String),
) {
    let pids: Vec<_> = patients.entities.iter().map(|p| &p.pid).collect();
    let duplicate_pids = duplicates(&pids);
    if !duplicate_pids.is_empty() {
        on_warning(format!(
            "Patient data table contains non-unique pid values: [{}]",
            join(&duplicate_pids)
        ));
    }

    let eids: Vec<_> = events.entities.iter().map(|e| &e.eid).collect();
    let duplicate_eids = duplicates(&eids);
    if !duplicate_eids.is_empty() {
        on_warning(format!(
            "Event data table contains non-unique eid values: [{}]",
            join(&duplicate_eids)
        ));
    }

    let known_pids: HashSet<_> = pids.iter().copied().collect();
    let mut dangling = Vec::new();
    let mut seen = HashSet::new();
    for event in &events.entities {
        if !known_pids.contains(&event.pid) && seen.insert(&event.pid) {
            dangling.push(&event.pid);
        }
    }
    if !dangling.is_empty() {
        on_warning(format!(
            "Event data table contains invalid pid references: [{}]",
            join(&dangling)
        ));
    }

    check_date_formats(&patients.columns, &patients.entities, "Patient", &mut on_error);
    check_date_formats(&events.columns, &events.entities, "Event", &mut on_error);
}

/// Run every check and collect the findings into a report.
pub fn check_consistency(patients: &PatientTable, events: &EventTable) -> ConsistencyReport {
    let mut warnings = Vec::new();
    let mut errors = Vec::new();
    check_consistency_with(
        patients,
        events,
        |message| warnings.push(message),
        |message| errors.push(message),
    );

    let issues = warnings
        .into_iter()
        .map(|message| Issue {
            severity: Severity::Warning,
            message,
        })
        .chain(errors.into_iter().map(|message| Issue {
            severity: Severity::Error,
            message,
        }))
        .collect();
    ConsistencyReport { issues }
}

/// Check that every value of a `date` column uses the `dd.MM.yyyy` format.
/// Reports the first offending value with its 1-based row number counted
/// from the file top, then stops for this table.
fn check_date_formats<E: Entity>(
    columns: &[Column],
    entities: &[E],
    entity_name: &str,
    on_error: &mut impl FnMut(String),
) {
    for column in columns.iter().filter(|c| c.ty == ColumnType::Date) {
        for (row, entity) in entities.iter().enumerate() {
            let value = entity
                .values()
                .get(column.index)
                .map(String::as_str)
                .unwrap_or("");
            if !value.is_empty() && !DATE_FORMAT.is_match(value) {
                on_error(format!(
                    "{entity_name} - Invalid date format for column \"{}\" in row {} ({value}). \
                     Dates must be in the format dd.MM.yyyy.",
                    column.name,
                    row + HEADER_ROW_COUNT + 1
                ));
                return;
            }
        }
    }
}

/// The values occurring more than once, each reported once, in first-seen
/// order.
fn duplicates<'a, T: Eq + Hash>(ids: &[&'a T]) -> Vec<&'a T> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut out = Vec::new();
    for id in ids {
        if !seen.insert(*id) && reported.insert(*id) {
            out.push(*id);
        }
    }
    out
}

fn join<T: fmt::Display>(ids: &[&T]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
