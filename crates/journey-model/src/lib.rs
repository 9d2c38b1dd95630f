pub mod columns;
pub mod entities;
pub mod error;
pub mod ids;
pub mod table;
pub mod values;

pub use columns::{Column, ColumnType, columns_contain};
pub use entities::{Entity, Event, FieldValue, Patient};
pub use error::{ModelError, Result};
pub use ids::{EntityId, EventId, PatientId};
pub use table::{EVENT_ID_TAG, EventTable, HEADER_ROW_COUNT, PATIENT_ID_TAG, PatientTable};
pub use values::{
    extract_category_value, extract_date_millis, extract_number_value, format_column_value,
    format_millis, parse_date, string_to_boolean, string_to_millis, string_to_number,
};
