use crate::payload;
use crate::schema::ColumnSchema;
use crate::timestamp::TimestampLocalizer;
use crate::types::{ColumnConfig, NormalizedRecord, RawRecord};
use std::cell::Cell;

/// Turns raw records into rows of a fixed column schema
pub struct RowNormalizer<'a> {
    schema: &'a ColumnSchema,
    config: &'a ColumnConfig,
    localizer: TimestampLocalizer,
    timestamp_failures: Cell<u64>,
}

impl<'a> RowNormalizer<'a> {
    pub fn new(
        schema: &'a ColumnSchema,
        config: &'a ColumnConfig,
        localizer: TimestampLocalizer,
    ) -> Self {
        RowNormalizer {
            schema,
            config,
            localizer,
            timestamp_failures: Cell::new(0),
        }
    }

    /// Normalize one record. Never fails: unparseable timestamps blank the
    /// derived columns and absent columns come out as `""`.
    pub fn normalize(&self, record: RawRecord) -> NormalizedRecord {
        let row = record.row;
        let mut merged = record.fields;

        let creation = merged
            .get(&self.config.creation_column)
            .filter(|value| !value.is_empty());
        if let Some(creation) = creation {
            match self.localizer.localize(creation) {
                Ok(stamp) => {
                    merged.insert(self.config.date_column.clone(), stamp.date);
                    merged.insert(self.config.time_column.clone(), stamp.time);
                }
                Err(err) => {
                    merged.insert(self.config.date_column.clone(), String::new());
                    merged.insert(self.config.time_column.clone(), String::new());
                    self.timestamp_failures.set(self.timestamp_failures.get() + 1);
                    tracing::warn!(row, error = %err, "leaving local date/time empty");
                }
            }
        }

        // Payload values win over same-named fields already in the row
        let pairs = payload::extract_pairs(
            merged
                .get(&self.config.payload_column)
                .map(String::as_str)
                .unwrap_or(""),
        );
        merged.extend(pairs);

        for column in self.config.removed_columns() {
            merged.remove(column);
        }

        let fields = self
            .schema
            .iter()
            .map(|column| {
                let value = merged.remove(column).unwrap_or_default();
                (column.to_string(), value)
            })
            .collect();

        NormalizedRecord { fields }
    }

    /// Rows whose creation timestamp could not be parsed so far
    pub fn timestamp_failures(&self) -> u64 {
        self.timestamp_failures.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::discover_schema;

    fn normalize_all(records: Vec<RawRecord>, config: &ColumnConfig) -> Vec<NormalizedRecord> {
        let schema = discover_schema(&records, config);
        let localizer = TimestampLocalizer::new(config.utc_offset_hours).unwrap();
        let normalizer = RowNormalizer::new(&schema, config, localizer);
        records.into_iter().map(|r| normalizer.normalize(r)).collect()
    }

    #[test]
    fn test_flattens_payload_and_derives_stamp() {
        let config = ColumnConfig::default();
        let records = vec![RawRecord::from_pairs(
            1,
            [
                ("CreationDate", "2023-01-01T14:30:00.0000000Z"),
                ("UserId", "alice@example.com"),
                ("Operation", "MailItemsAccessed"),
                ("AuditData", r#"{"ClientIP":"10.1.1.1","Workload":"Exchange"}"#),
                ("AssociatedAdminUnits", "unit"),
                ("RecordType", "50"),
            ],
        )];

        let out = normalize_all(records, &config);
        let row = &out[0];

        assert_eq!(
            row.columns().collect::<Vec<_>>(),
            vec!["CreationDate", "Date", "Time", "UserId", "Operation", "ClientIP", "Workload"]
        );
        assert_eq!(row.get("CreationDate"), Some("2023-01-01T14:30:00.0000000Z"));
        assert_eq!(row.get("Date"), Some("02-01-2023"));
        assert_eq!(row.get("Time"), Some("00:30:00"));
        assert_eq!(row.get("ClientIP"), Some("10.1.1.1"));
        assert_eq!(row.get("AuditData"), None);
        assert_eq!(row.get("RecordType"), None);
    }

    #[test]
    fn test_key_set_matches_schema_for_every_row() {
        let config = ColumnConfig::default();
        let records = vec![
            RawRecord::from_pairs(1, [("AuditData", r#""Foo":"1""#)]),
            RawRecord::from_pairs(2, [("AuditData", r#""Bar":"2""#)]),
            RawRecord::from_pairs(3, [("UserId", "nobody")]),
        ];
        let schema = discover_schema(&records, &config);

        for row in normalize_all(records, &config) {
            assert_eq!(row.columns().collect::<Vec<_>>(), schema.iter().collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_missing_dynamic_values_are_empty() {
        let config = ColumnConfig::default();
        let records = vec![
            RawRecord::from_pairs(1, [("AuditData", r#""Foo":"1""#)]),
            RawRecord::from_pairs(2, [("AuditData", r#""Bar":"2""#)]),
        ];

        let out = normalize_all(records, &config);
        assert_eq!(out[1].get("Foo"), Some(""));
        assert_eq!(out[1].get("Bar"), Some("2"));
        assert_eq!(out[1].get("Date"), Some(""));
    }

    #[test]
    fn test_payload_overrides_static_field() {
        let config = ColumnConfig::default();
        let records = vec![RawRecord::from_pairs(
            1,
            [
                ("UserId", "outer"),
                ("Operation", "Outer"),
                ("AuditData", r#"{"UserId":"inner","Date":"custom"}"#),
                ("CreationDate", "2023-01-01T05:00:00"),
            ],
        )];

        let out = normalize_all(records, &config);
        assert_eq!(out[0].get("UserId"), Some("inner"));
        assert_eq!(out[0].get("Operation"), Some("Outer"));
        assert_eq!(out[0].get("Date"), Some("custom"));
        assert_eq!(out[0].get("Time"), Some("15:00:00"));
    }

    #[test]
    fn test_malformed_timestamp_is_counted_not_fatal() {
        let config = ColumnConfig::default();
        let records = vec![RawRecord::from_pairs(
            1,
            [("CreationDate", "yesterday"), ("UserId", "bob")],
        )];
        let schema = discover_schema(&records, &config);
        let normalizer = RowNormalizer::new(&schema, &config, TimestampLocalizer::new(10).unwrap());

        let row = normalizer.normalize(records.into_iter().next().unwrap());
        assert_eq!(row.get("CreationDate"), Some("yesterday"));
        assert_eq!(row.get("Date"), Some(""));
        assert_eq!(row.get("Time"), Some(""));
        assert_eq!(row.get("UserId"), Some("bob"));
        assert_eq!(normalizer.timestamp_failures(), 1);
    }

    #[test]
    fn test_malformed_timestamp_blanks_existing_date_time() {
        let config = ColumnConfig::default();
        let records = vec![RawRecord::from_pairs(
            1,
            [
                ("CreationDate", "garbage"),
                ("Date", "01-01-1999"),
                ("Time", "12:00:00"),
                ("UserId", "a"),
            ],
        )];

        let out = normalize_all(records, &config);
        assert_eq!(out[0].get("Date"), Some(""));
        assert_eq!(out[0].get("Time"), Some(""));
        assert_eq!(out[0].get("UserId"), Some("a"));
    }

    #[test]
    fn test_empty_timestamp_is_not_an_error() {
        let config = ColumnConfig::default();
        let records = vec![RawRecord::from_pairs(1, [("CreationDate", "")])];
        let schema = discover_schema(&records, &config);
        let normalizer = RowNormalizer::new(&schema, &config, TimestampLocalizer::new(10).unwrap());

        let row = normalizer.normalize(records.into_iter().next().unwrap());
        assert_eq!(row.get("Date"), Some(""));
        assert_eq!(normalizer.timestamp_failures(), 0);
    }

    #[test]
    fn test_payload_key_named_like_payload_column_stays_empty() {
        let config = ColumnConfig::default();
        let records = vec![RawRecord::from_pairs(1, [("AuditData", r#""AuditData":"nested""#)])];

        let out = normalize_all(records, &config);
        assert_eq!(out[0].get("AuditData"), Some(""));
    }
}
