//! Streaming schema discovery
//!
//! Records are fed one at a time into a [`SchemaDiscoverer`], which only
//! remembers the dynamic keys seen so far. The final [`ColumnSchema`] is
//! assembled once in [`SchemaDiscoverer::build`].

use crate::payload;
use crate::schema::ColumnSchema;
use crate::types::{ColumnConfig, RawRecord};

/// Accumulates payload keys across every record of one input
#[derive(Debug)]
pub struct SchemaDiscoverer<'a> {
    config: &'a ColumnConfig,
    dynamic: ColumnSchema,
    rows: u64,
}

impl<'a> SchemaDiscoverer<'a> {
    pub fn new(config: &'a ColumnConfig) -> Self {
        SchemaDiscoverer {
            config,
            dynamic: ColumnSchema::new(),
            rows: 0,
        }
    }

    /// Scan one record's payload for keys
    pub fn add_record(&mut self, record: &RawRecord) {
        self.rows += 1;
        let payload = record.get_or_empty(&self.config.payload_column);
        for key in payload::tokenize(payload).map(|(key, _)| key) {
            if self.dynamic.push(key) {
                tracing::debug!(column = key, row = record.row, "discovered dynamic column");
            }
        }
    }

    /// Number of records scanned so far
    pub fn rows_scanned(&self) -> u64 {
        self.rows
    }

    /// Static columns followed by every dynamic key that is not itself static
    pub fn build(self) -> ColumnSchema {
        let mut schema: ColumnSchema = self.config.static_columns().into_iter().collect();
        for key in self.dynamic.iter() {
            schema.push(key);
        }
        schema
    }
}

/// Discover the column schema of a complete set of records
pub fn discover_schema<'r>(
    records: impl IntoIterator<Item = &'r RawRecord>,
    config: &ColumnConfig,
) -> ColumnSchema {
    let mut discoverer = SchemaDiscoverer::new(config);
    for record in records {
        discoverer.add_record(record);
    }
    discoverer.build()
}
