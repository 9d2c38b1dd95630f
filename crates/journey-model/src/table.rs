//! Patient and event tables, constructed from pre-parsed rows.
//!
//! A table is delivered as plain rows of strings: the first row holds the
//! column names, the second the lowercase column type tags, and every row
//! after that is data. The special tags `pid` and `eid` mark identifier
//! columns; identifier columns filter and sort as plain text.

use serde::{Deserialize, Serialize};

use crate::columns::{Column, ColumnType};
use crate::entities::{Event, Patient};
use crate::error::ModelError;
use crate::ids::{EntityId, EventId, PatientId};

/// Number of header rows preceding the data rows.
pub const HEADER_ROW_COUNT: usize = 2;

/// Type tag marking the patient-id column.
pub const PATIENT_ID_TAG: &str = "pid";
/// Type tag marking the event-id column.
pub const EVENT_ID_TAG: &str = "eid";

/// The patient table: column metadata plus all rows in import order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientTable {
    pub columns: Vec<Column>,
    pub entities: Vec<Patient>,
}

impl PatientTable {
    pub fn new(columns: Vec<Column>, entities: Vec<Patient>) -> Self {
        Self { columns, entities }
    }

    /// Build the patient table from pre-parsed rows.
    ///
    /// A missing `pid` tag is tolerated: the row index identifies patients
    /// and a warning is reported. Unknown type tags fall back to `string`
    /// with a warning.
    pub fn from_rows(rows: &[Vec<String>], mut on_warning: impl FnMut(String)) -> Self {
        let Some((names, rest)) = rows.split_first() else {
            return Self::default();
        };
        let Some((tags, data_rows)) = rest.split_first() else {
            return Self::default();
        };
        let tags: Vec<String> = tags.iter().map(|tag| tag.to_lowercase()).collect();

        let id_column = tags.iter().position(|tag| tag == PATIENT_ID_TAG);
        if id_column.is_none() {
            on_warning(format!(
                "No '{PATIENT_ID_TAG}' column type found in patient data table. \
                 Using row index to identify patients."
            ));
        }

        let columns = parse_columns(names, &tags, "patient", &[PATIENT_ID_TAG], &mut on_warning);

        let entities = data_rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let id = row_id(row, id_column, index);
                Patient {
                    uid: EntityId::new(id.clone()),
                    pid: PatientId::new(id),
                    values: row.clone(),
                }
            })
            .collect();

        Self { columns, entities }
    }
}

/// The event table: column metadata plus all rows in import order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTable {
    pub columns: Vec<Column>,
    pub entities: Vec<Event>,
}

impl EventTable {
    pub fn new(columns: Vec<Column>, entities: Vec<Event>) -> Self {
        Self { columns, entities }
    }

    /// Build the event table from pre-parsed rows.
    ///
    /// A `pid` tag is mandatory (events are meaningless without their
    /// foreign key); a missing `eid` tag is tolerated like the patient
    /// table's `pid`. Rows with a deviating column count or blank
    /// date/timestamp cells are reported as warnings and kept as-is.
    pub fn from_rows(
        rows: &[Vec<String>],
        mut on_warning: impl FnMut(String),
    ) -> Result<Self, ModelError> {
        let Some((names, rest)) = rows.split_first() else {
            return Err(ModelError::MissingPatientIdColumn);
        };
        let Some((tags, data_rows)) = rest.split_first() else {
            return Err(ModelError::MissingPatientIdColumn);
        };
        let tags: Vec<String> = tags.iter().map(|tag| tag.to_lowercase()).collect();

        let pid_column = tags
            .iter()
            .position(|tag| tag == PATIENT_ID_TAG)
            .ok_or(ModelError::MissingPatientIdColumn)?;

        let eid_column = tags.iter().position(|tag| tag == EVENT_ID_TAG);
        if eid_column.is_none() {
            on_warning(format!(
                "No '{EVENT_ID_TAG}' column type found in event data table. \
                 Using row index to identify events."
            ));
        }

        let columns = parse_columns(
            names,
            &tags,
            "event",
            &[PATIENT_ID_TAG, EVENT_ID_TAG],
            &mut on_warning,
        );

        let entities = data_rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                validate_event_row(index + 1 + HEADER_ROW_COUNT, row, &columns, &mut on_warning);
                let id = row_id(row, eid_column, index);
                let pid = row.get(pid_column).cloned().unwrap_or_default();
                Event {
                    uid: EntityId::new(id.clone()),
                    eid: EventId::new(id),
                    pid: PatientId::new(pid),
                    values: row.clone(),
                }
            })
            .collect();

        Ok(Self { columns, entities })
    }
}

/// The id for a data row: the id column's value when present, the row
/// index otherwise.
fn row_id(row: &[String], id_column: Option<usize>, index: usize) -> String {
    id_column
        .and_then(|column| row.get(column).cloned())
        .unwrap_or_else(|| index.to_string())
}

fn parse_columns(
    names: &[String],
    tags: &[String],
    table: &str,
    id_tags: &[&str],
    on_warning: &mut impl FnMut(String),
) -> Vec<Column> {
    names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let tag = tags.get(index).map(String::as_str).unwrap_or("");
            let ty = if id_tags.contains(&tag) {
                // Identifier columns filter and sort as plain text.
                ColumnType::String
            } else {
                tag.parse().unwrap_or_else(|_| {
                    on_warning(format!(
                        "Invalid column type '{tag}' found in {table} data table. \
                         Falling back to 'string'."
                    ));
                    ColumnType::String
                })
            };
            Column::new(name.clone(), ty, index)
        })
        .collect()
}

fn validate_event_row(
    row_nr: usize,
    row: &[String],
    columns: &[Column],
    on_warning: &mut impl FnMut(String),
) {
    if row.len() != columns.len() {
        on_warning(format!(
            "Invalid number of columns in row: {row_nr} (expected {})",
            columns.len()
        ));
    }

    for column in columns {
        if !matches!(column.ty, ColumnType::Date | ColumnType::Timestamp) {
            continue;
        }
        let value = row.get(column.index).map(String::as_str).unwrap_or("");
        if value.is_empty() {
            on_warning(format!(
                "Invalid date or timestamp value '{value}' for column '{}' in row: {row_nr}",
                column.name
            ));
        }
    }
}
