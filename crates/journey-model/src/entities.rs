use serde::{Deserialize, Serialize};

use crate::columns::Column;
use crate::ids::{EntityId, EventId, PatientId};

/// A single table row: a stable identifier plus positional raw values.
///
/// Entities are immutable once constructed; filtering, sorting and
/// cross-referencing only ever produce new views over the same rows.
pub trait Entity {
    fn uid(&self) -> &EntityId;

    fn values(&self) -> &[String];

    /// Resolve the cell addressed by `column`.
    ///
    /// A row shorter than the column's index yields [`FieldValue::Missing`];
    /// an empty string is a present value like any other.
    fn field_value(&self, column: &Column) -> FieldValue<'_> {
        match self.values().get(column.index) {
            Some(value) => FieldValue::Value(value),
            None => FieldValue::Missing,
        }
    }
}

/// Result of a cell lookup, distinguishing a genuinely absent cell from an
/// empty one. Filters never match a missing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Missing,
    Value(&'a str),
}

impl<'a> FieldValue<'a> {
    pub fn as_option(self) -> Option<&'a str> {
        match self {
            FieldValue::Value(value) => Some(value),
            FieldValue::Missing => None,
        }
    }
}

/// A row of the patient table.
///
/// `pid` is typically equal to `uid`, but `uid` is derived independently
/// (from the id column or the row index) to tolerate duplicate or missing
/// patient-id columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub uid: EntityId,
    pub pid: PatientId,
    pub values: Vec<String>,
}

impl Entity for Patient {
    fn uid(&self) -> &EntityId {
        &self.uid
    }

    fn values(&self) -> &[String] {
        &self.values
    }
}

/// A row of the event table. `pid` references a row of the patient table;
/// the reference is not enforced, only checked by the consistency checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub uid: EntityId,
    pub eid: EventId,
    pub pid: PatientId,
    pub values: Vec<String>,
}

impl Entity for Event {
    fn uid(&self) -> &EntityId {
        &self.uid
    }

    fn values(&self) -> &[String] {
        &self.values
    }
}
