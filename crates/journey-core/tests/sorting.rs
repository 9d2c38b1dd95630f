//! Sorting tests over a fixture with blank and malformed values.

use journey_core::{SortState, stable_sort};
use journey_model::{Column, ColumnType, Patient, PatientTable};

fn test_table() -> PatientTable {
    let rows: Vec<Vec<String>> = [
        vec!["Id", "StringColumn", "NumberColumn", "DateColumn", "BooleanColumn", "TimestampColumn"],
        vec!["pid", "string", "number", "date", "boolean", "timestamp"],
        vec!["a", "100", "100", "01.01.2022", "false", "3"],
        vec!["b", "1e1", "1e1", "01.01.2022", "true", "1"],
        vec!["c", "NaN", "NaN", "02.01.2021", "false", "2"],
        vec!["d", "", "", "", "", ""],
        vec!["e", "-", "-", "-", "-", "-"],
    ]
    .iter()
    .map(|row| row.iter().map(|cell| cell.to_string()).collect())
    .collect();
    PatientTable::from_rows(&rows, |_| {})
}

fn sorted_uids(table: &PatientTable, state: &SortState) -> Vec<String> {
    let rows: Vec<&Patient> = table.entities.iter().collect();
    stable_sort(&rows, state)
        .iter()
        .map(|row| row.uid.as_str().to_string())
        .collect()
}

fn asc(column: &Column) -> SortState {
    SortState::Asc {
        column: column.clone(),
    }
}

fn desc(column: &Column) -> SortState {
    SortState::Desc {
        column: column.clone(),
    }
}

#[test]
fn neutral_preserves_import_order() {
    let table = test_table();
    assert_eq!(sorted_uids(&table, &SortState::Neutral), ["a", "b", "c", "d", "e"]);
}

#[test]
fn string_sort_is_lexicographic_with_blanks_last() {
    let table = test_table();
    let column = &table.columns[1];
    assert_eq!(sorted_uids(&table, &asc(column)), ["e", "a", "b", "c", "d"]);
    // blanks stay at the end under desc as well
    assert_eq!(sorted_uids(&table, &desc(column)), ["c", "b", "a", "e", "d"]);
}

#[test]
fn number_sort_is_numeric_not_lexicographic() {
    let table = test_table();
    let column = &table.columns[2];
    // 1e1 < 100; "NaN", "" and "-" all resolve to missing
    assert_eq!(sorted_uids(&table, &asc(column)), ["b", "a", "c", "d", "e"]);
    assert_eq!(sorted_uids(&table, &desc(column)), ["a", "b", "c", "d", "e"]);
}

#[test]
fn date_sort_orders_by_calendar_day() {
    let table = test_table();
    let column = &table.columns[3];
    assert_eq!(sorted_uids(&table, &asc(column)), ["c", "a", "b", "d", "e"]);
    assert_eq!(sorted_uids(&table, &desc(column)), ["a", "b", "c", "d", "e"]);
}

#[test]
fn boolean_sort_places_checked_rows_first() {
    let table = test_table();
    let column = &table.columns[4];
    // "-" coerces to false; only the blank is missing
    assert_eq!(sorted_uids(&table, &asc(column)), ["b", "a", "c", "e", "d"]);
    assert_eq!(sorted_uids(&table, &desc(column)), ["a", "c", "e", "b", "d"]);
}

#[test]
fn timestamp_sort_orders_by_raw_millis() {
    let table = test_table();
    let column = &table.columns[5];
    assert_eq!(sorted_uids(&table, &asc(column)), ["b", "c", "a", "d", "e"]);
}

#[test]
fn sorting_is_idempotent() {
    let table = test_table();
    let state = asc(&table.columns[2]);
    let rows: Vec<&Patient> = table.entities.iter().collect();
    let once = stable_sort(&rows, &state);
    let twice = stable_sort(&once, &state);
    let once_uids: Vec<&str> = once.iter().map(|row| row.uid.as_str()).collect();
    let twice_uids: Vec<&str> = twice.iter().map(|row| row.uid.as_str()).collect();
    assert_eq!(once_uids, twice_uids);
}

#[test]
fn category_sort_is_case_sensitive_string_sort_is_not() {
    let rows: Vec<Vec<String>> = [
        vec!["Id", "Value"],
        vec!["pid", "category"],
        vec!["1", "B"],
        vec!["2", "a"],
    ]
    .iter()
    .map(|row| row.iter().map(|cell| cell.to_string()).collect())
    .collect();
    let table = PatientTable::from_rows(&rows, |_| {});
    assert_eq!(sorted_uids(&table, &asc(&table.columns[1])), ["1", "2"]);

    let as_string = Column::new("Value", ColumnType::String, 1);
    assert_eq!(sorted_uids(&table, &asc(&as_string)), ["2", "1"]);
}

#[test]
fn sort_state_serializes_with_a_type_tag() {
    let json = serde_json::to_value(SortState::Neutral).expect("serialize state");
    assert_eq!(json["type"], "neutral");

    let state = SortState::Asc {
        column: Column::new("Age", ColumnType::Number, 1),
    };
    let json = serde_json::to_value(&state).expect("serialize state");
    assert_eq!(json["type"], "asc");
    let round: SortState = serde_json::from_value(json).expect("deserialize state");
    assert_eq!(round, state);
}
