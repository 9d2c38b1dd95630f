//! Stable, type-aware sorting of entity views.
//!
//! Missing and malformed values sort to the end in both directions; the
//! direction sign applies only between two present values.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use journey_model::{
    Column, ColumnType, Entity, FieldValue, string_to_boolean, string_to_millis, string_to_number,
};

/// Column sorting state. `Neutral` keeps the import order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SortState {
    Neutral,
    Asc { column: Column },
    Desc { column: Column },
}

/// Sort a view of entities by the given state.
///
/// `slice::sort_by` is stable, so rows comparing equal keep their import
/// order and re-sorting an already sorted view is a no-op.
pub fn stable_sort<'a, E: Entity>(rows: &[&'a E], state: &SortState) -> Vec<&'a E> {
    match state {
        SortState::Neutral => rows.to_vec(),
        SortState::Asc { column } => sorted(rows, column, Direction::Asc),
        SortState::Desc { column } => sorted(rows, column, Direction::Desc),
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

fn sorted<'a, E: Entity>(rows: &[&'a E], column: &Column, direction: Direction) -> Vec<&'a E> {
    let mut sorted: Vec<&E> = rows.to_vec();
    sorted.sort_by(|a, b| compare_entities(*a, *b, column, direction));
    sorted
}

fn compare_entities<E: Entity>(
    a: &E,
    b: &E,
    column: &Column,
    direction: Direction,
) -> Ordering {
    match (sort_key(a, column), sort_key(b, column)) {
        (SortKey::Missing, SortKey::Missing) => Ordering::Equal,
        (SortKey::Missing, _) => Ordering::Greater,
        (_, SortKey::Missing) => Ordering::Less,
        (key_a, key_b) => direction.apply(key_a.compare_present(&key_b)),
    }
}

/// The comparison key a cell resolves to under its column's type.
enum SortKey<'a> {
    Missing,
    /// Numbers, timestamps and date millis; never `NaN`.
    Number(f64),
    Text(&'a str),
    Category(&'a str),
    Bool(bool),
}

fn sort_key<'a, E: Entity>(entity: &'a E, column: &Column) -> SortKey<'a> {
    let value = match entity.field_value(column) {
        FieldValue::Value(value) => value,
        FieldValue::Missing => return SortKey::Missing,
    };
    match column.ty {
        ColumnType::Number | ColumnType::Timestamp => {
            let number = string_to_number(value);
            if number.is_nan() {
                SortKey::Missing
            } else {
                SortKey::Number(number)
            }
        }
        ColumnType::Date => {
            let millis = string_to_millis(value);
            if millis.is_nan() {
                SortKey::Missing
            } else {
                SortKey::Number(millis)
            }
        }
        ColumnType::Boolean => {
            if value.trim().is_empty() {
                SortKey::Missing
            } else {
                SortKey::Bool(string_to_boolean(value))
            }
        }
        ColumnType::Category => {
            if value.trim().is_empty() {
                SortKey::Missing
            } else {
                SortKey::Category(value)
            }
        }
        ColumnType::String => {
            if value.trim().is_empty() {
                SortKey::Missing
            } else {
                SortKey::Text(value)
            }
        }
    }
}

impl SortKey<'_> {
    fn compare_present(&self, other: &SortKey<'_>) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            // checked rows first
            (SortKey::Bool(a), SortKey::Bool(b)) => b.cmp(a),
            (SortKey::Category(a), SortKey::Category(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => compare_text(a, b),
            // keys of one comparison always come from the same column
            _ => Ordering::Equal,
        }
    }
}

/// Case-insensitive ordering with a case-sensitive tie-break.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
