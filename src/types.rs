use serde::Serialize;
use std::collections::HashMap;

/// One input row, keyed by header name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based position among the data rows (header excluded)
    pub row: u64,

    /// Field values by column name
    pub fields: HashMap<String, String>,
}

impl RawRecord {
    pub fn new(row: u64, fields: HashMap<String, String>) -> Self {
        RawRecord { row, fields }
    }

    /// Build a record from `(column, value)` pairs
    pub fn from_pairs<K, V>(row: u64, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        RawRecord {
            row,
            fields: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Field value, or `""` when the column is absent from this row
    pub fn get_or_empty(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }
}

/// One output row, holding exactly the columns of the schema it was projected onto
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRecord {
    /// `(column, value)` pairs in schema order
    pub fields: Vec<(String, String)>,
}

impl NormalizedRecord {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, value)| value.as_str())
    }
}

/// Configuration for the columnising process
#[derive(Debug, Clone, Serialize)]
pub struct ColumnConfig {
    /// UTC creation timestamp column, copied through and used to derive date/time
    pub creation_column: String,

    /// Derived local date column (`DD-MM-YYYY`)
    pub date_column: String,

    /// Derived local time column (`HH:MM:SS`)
    pub time_column: String,

    /// User identifier column
    pub user_column: String,

    /// Operation name column
    pub operation_column: String,

    /// Column holding the embedded `"key":"value"` payload
    pub payload_column: String,

    /// Auxiliary columns removed from every row alongside the payload
    pub dropped_columns: Vec<String>,

    /// Fixed offset added to the UTC timestamp
    pub utc_offset_hours: i64,

    /// Inserted between the input file stem and `.csv` when deriving an output path
    pub output_suffix: String,

    /// Drop the first data row from the output while still scanning it for columns
    pub skip_first_data_row: bool,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        ColumnConfig {
            creation_column: String::from("CreationDate"),
            date_column: String::from("Date"),
            time_column: String::from("Time"),
            user_column: String::from("UserId"),
            operation_column: String::from("Operation"),
            payload_column: String::from("AuditData"),
            dropped_columns: vec![
                String::from("AssociatedAdminUnits"),
                String::from("AssociatedAdminUnitsNames"),
            ],
            utc_offset_hours: 10,
            output_suffix: String::from("_processed"),
            skip_first_data_row: true,
        }
    }
}

impl ColumnConfig {
    /// The fixed leading columns of every schema, in output order
    pub fn static_columns(&self) -> [&str; 5] {
        [
            self.creation_column.as_str(),
            self.date_column.as_str(),
            self.time_column.as_str(),
            self.user_column.as_str(),
            self.operation_column.as_str(),
        ]
    }

    /// Columns stripped from the merged row before projection
    pub fn removed_columns(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.payload_column.as_str())
            .chain(self.dropped_columns.iter().map(String::as_str))
    }
}
