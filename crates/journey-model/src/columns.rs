use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of value types a table column can declare.
///
/// Column types are read from the second header row of a data table
/// (lowercase tags) and drive filtering, sorting and display formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Boolean,
    Number,
    /// Calendar day in `dd.MM.yyyy` format.
    Date,
    /// Raw epoch milliseconds.
    Timestamp,
    Category,
}

impl ColumnType {
    /// Returns the lowercase tag as it appears in the type header row.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Boolean => "boolean",
            ColumnType::Number => "number",
            ColumnType::Date => "date",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Category => "category",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = String;

    /// Parse a type tag, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "string" => Ok(ColumnType::String),
            "boolean" => Ok(ColumnType::Boolean),
            "number" => Ok(ColumnType::Number),
            "date" => Ok(ColumnType::Date),
            "timestamp" => Ok(ColumnType::Timestamp),
            "category" => Ok(ColumnType::Category),
            _ => Err(format!("Unknown column type: {s}")),
        }
    }
}

/// A column of a patient or event table.
///
/// `index` is the position of this column's value within an entity's value
/// list; it is the sole addressing mechanism during filtering and sorting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
    pub index: usize,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: ColumnType, index: usize) -> Self {
        Self {
            name: name.into(),
            ty,
            index,
        }
    }
}

/// Returns true if `columns` contains a column with the same name, type and
/// index as `column`.
pub fn columns_contain(columns: &[Column], column: &Column) -> bool {
    columns.iter().any(|c| c == column)
}
