//! String-to-typed value coercion and display formatting.
//!
//! Cell values are kept as raw strings; these functions define how each
//! column type reads and renders them. Every coercion is total: malformed
//! input degrades to `NaN`/`false`/empty rather than an error, and is
//! pushed to the "missing" end of any ordering downstream.

use chrono::{DateTime, NaiveDate, NaiveTime};

use crate::columns::{Column, ColumnType};
use crate::entities::{Entity, FieldValue};

/// Cell format for `date` columns.
pub const DATE_FORMAT: &str = "%d.%m.%Y";
/// Display format for timestamp values.
pub const DATE_TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M";

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Parse a cell as a number. Blank cells are `NaN`, never `0`.
pub fn string_to_number(s: &str) -> f64 {
    if is_blank(s) {
        f64::NAN
    } else {
        s.trim().parse().unwrap_or(f64::NAN)
    }
}

/// Strict JSON boolean parse: only the literal `true` is true; any parse
/// failure (blank, `"TRUE"`, arbitrary text) is `false`.
pub fn string_to_boolean(s: &str) -> bool {
    serde_json::from_str(s.trim()).unwrap_or(false)
}

/// Parse a `date` cell, strictly in `dd.MM.yyyy` format.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Epoch milliseconds (UTC midnight) of a `dd.MM.yyyy` cell, `NaN` when
/// malformed.
pub fn string_to_millis(s: &str) -> f64 {
    match parse_date(s) {
        Some(date) => date.and_time(NaiveTime::MIN).and_utc().timestamp_millis() as f64,
        None => f64::NAN,
    }
}

/// Format epoch milliseconds as `dd.MM.yyyy HH:mm`, or empty when not
/// finite or out of range.
pub fn format_millis(ms: f64) -> String {
    if !ms.is_finite() {
        return String::new();
    }
    match DateTime::from_timestamp_millis(ms as i64) {
        Some(instant) => instant.format(DATE_TIMESTAMP_FORMAT).to_string(),
        None => String::new(),
    }
}

/// Render a raw cell for display according to its column type.
///
/// Booleans render as a check mark (`"X"`) or nothing, timestamps as a
/// formatted instant; everything else verbatim. Blank input renders empty.
pub fn format_column_value(ty: ColumnType, value: &str) -> String {
    if is_blank(value) {
        return String::new();
    }
    match ty {
        ColumnType::Boolean => {
            if string_to_boolean(value) {
                "X".to_string()
            } else {
                String::new()
            }
        }
        ColumnType::Timestamp => format_millis(string_to_number(value)),
        _ => value.to_string(),
    }
}

fn present_value<'a, E: Entity>(entity: &'a E, column: &Column) -> Option<&'a str> {
    match entity.field_value(column) {
        FieldValue::Value(value) if !is_blank(value) => Some(value),
        _ => None,
    }
}

/// Extract a numeric value, `None` when the cell is absent or blank. A
/// non-blank, non-numeric cell yields `Some(NaN)`.
pub fn extract_number_value<E: Entity>(entity: &E, column: &Column) -> Option<f64> {
    present_value(entity, column).map(string_to_number)
}

/// Extract a point in time as epoch milliseconds, `None` when the cell is
/// absent or blank. Timestamp columns hold raw millis; date columns are
/// parsed as `dd.MM.yyyy`.
pub fn extract_date_millis<E: Entity>(entity: &E, column: &Column) -> Option<f64> {
    let value = present_value(entity, column)?;
    match column.ty {
        ColumnType::Timestamp => Some(string_to_number(value)),
        _ => Some(string_to_millis(value)),
    }
}

/// Extract a category value, `None` when the cell is absent or blank.
pub fn extract_category_value<'a, E: Entity>(entity: &'a E, column: &Column) -> Option<&'a str> {
    present_value(entity, column)
}
