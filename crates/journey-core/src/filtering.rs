//! Typed filter predicates over patient and event rows.
//!
//! A filter addresses one column and restricts rows by that column's
//! value. Applying a list of filters folds them left to right, so filters
//! on one table combine as a logical AND; each step only shrinks the set,
//! making the fold order-independent.

use serde::{Deserialize, Serialize};

use journey_model::{
    Column, Entity, FieldValue, string_to_boolean, string_to_millis, string_to_number,
};

/// Sentinel for an unset date/timestamp filter bound.
pub const MILLIS_NONE: i64 = -1;

/// A single active filter. One variant per column-type family; the match
/// in [`apply_filter`] is exhaustive, so no unsupported filter shape can
/// reach the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Filter {
    /// Case-insensitive substring match on string, category and id
    /// columns. Empty text keeps every row whose field is present.
    Text { column: Column, text: String },
    /// Inclusive numeric range; a `NaN` bound is open.
    Number { column: Column, from: f64, to: f64 },
    /// Exact boolean match; `None` keeps everything.
    Boolean {
        column: Column,
        is_true: Option<bool>,
    },
    /// Inclusive range over `dd.MM.yyyy` cells, bounds in epoch millis.
    Date {
        column: Column,
        millis_from: i64,
        millis_to: i64,
    },
    /// Inclusive range over raw epoch-millis cells.
    Timestamp {
        column: Column,
        millis_from: i64,
        millis_to: i64,
    },
}

impl Filter {
    /// The column this filter addresses.
    pub fn column(&self) -> &Column {
        match self {
            Filter::Text { column, .. }
            | Filter::Number { column, .. }
            | Filter::Boolean { column, .. }
            | Filter::Date { column, .. }
            | Filter::Timestamp { column, .. } => column,
        }
    }
}

/// Keep the rows satisfying `filter`, preserving relative order.
///
/// Open filters (both bounds unset, `None` boolean) return the input
/// unchanged without a scan. A missing field never matches, regardless of
/// the filter value.
pub fn apply_filter<'a, E: Entity>(rows: Vec<&'a E>, filter: &Filter) -> Vec<&'a E> {
    match filter {
        Filter::Text { column, text } => {
            let needle = text.to_lowercase();
            rows.into_iter()
                .filter(|row| match row.field_value(column) {
                    FieldValue::Value(value) => value.to_lowercase().contains(&needle),
                    FieldValue::Missing => false,
                })
                .collect()
        }
        Filter::Number { column, from, to } => {
            if from.is_nan() && to.is_nan() {
                return rows;
            }
            rows.into_iter()
                .filter(|row| match row.field_value(column) {
                    FieldValue::Value(value) => {
                        let number = string_to_number(value);
                        (from.is_nan() || number >= *from) && (to.is_nan() || number <= *to)
                    }
                    FieldValue::Missing => false,
                })
                .collect()
        }
        Filter::Boolean { column, is_true } => {
            let Some(expected) = is_true else {
                return rows;
            };
            rows.into_iter()
                .filter(|row| match row.field_value(column) {
                    FieldValue::Value(value) => string_to_boolean(value) == *expected,
                    FieldValue::Missing => false,
                })
                .collect()
        }
        Filter::Date {
            column,
            millis_from,
            millis_to,
        } => filter_millis_range(rows, column, *millis_from, *millis_to, string_to_millis),
        Filter::Timestamp {
            column,
            millis_from,
            millis_to,
        } => filter_millis_range(rows, column, *millis_from, *millis_to, string_to_number),
    }
}

fn filter_millis_range<'a, E: Entity>(
    rows: Vec<&'a E>,
    column: &Column,
    millis_from: i64,
    millis_to: i64,
    resolve: fn(&str) -> f64,
) -> Vec<&'a E> {
    let open_from = millis_from == MILLIS_NONE;
    let open_to = millis_to == MILLIS_NONE;
    if open_from && open_to {
        return rows;
    }

    let from = millis_from as f64;
    let to = end_of_day_adjusted(millis_to) as f64;

    rows.into_iter()
        .filter(|row| match row.field_value(column) {
            FieldValue::Value(value) => {
                let millis = resolve(value);
                (open_from || millis >= from) && (open_to || millis <= to)
            }
            FieldValue::Missing => false,
        })
        .collect()
}

/// A `to` bound at a UTC midnight means "the entire day": the comparison
/// bound is extended to 23:59:59.999, the stored filter value stays as-is.
fn end_of_day_adjusted(millis_to: i64) -> i64 {
    const DAY: i64 = 86_400_000;
    const MINUTE: i64 = 60_000;
    let within_day = millis_to.rem_euclid(DAY);
    if within_day < MINUTE {
        millis_to - within_day + (DAY - 1)
    } else {
        millis_to
    }
}

/// Apply every filter in turn, left to right.
pub fn apply_filters<'a, E: Entity>(entities: &'a [E], filters: &[Filter]) -> Vec<&'a E> {
    let rows: Vec<&E> = entities.iter().collect();
    filters
        .iter()
        .fold(rows, |rows, filter| apply_filter(rows, filter))
}

/// Restrict a flat filter list to the filters addressing one of `columns`.
///
/// The caller holds a single filter list across both tables; this derives
/// the per-table list by column-name membership.
pub fn filters_for_columns(filters: &[Filter], columns: &[Column]) -> Vec<Filter> {
    filters
        .iter()
        .filter(|filter| {
            columns
                .iter()
                .any(|column| column.name == filter.column().name)
        })
        .cloned()
        .collect()
}
