//! # audit-columnise - Audit Log Flattening
//!
//! Converts exported audit-log CSVs into a normalized CSV where the
//! semi-structured `AuditData` payload is spread out into first-class
//! columns.
//!
//! ## Pipeline
//!
//! The input is read twice:
//!
//! 1. **Discovery** scans every row's payload for `"key":"value"` pairs and
//!    builds the [`ColumnSchema`]: the static columns `CreationDate, Date,
//!    Time, UserId, Operation` followed by each payload key in first-seen order.
//! 2. **Normalization** rewrites every row onto that schema, deriving local
//!    `Date`/`Time` from the UTC `CreationDate` and filling absent columns
//!    with empty strings.
//!
//! With the default [`ColumnConfig`] the first data row is scanned during
//! discovery but not written. Set `skip_first_data_row = false` to keep it.
//!
//! ## Quick Start
//!
//! ```rust
//! use audit_columnise::{columnise_reader, ColumnConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let input = "CreationDate,UserId,Operation,AuditData\n\
//!     2023-01-01T05:00:00,alice,Login,\"{\"\"Foo\"\":\"\"1\"\"}\"\n\
//!     2023-01-01T14:30:00,bob,Logout,\"{\"\"Bar\"\":\"\"2\"\"}\"\n";
//!
//! let mut output = Vec::new();
//! let summary = columnise_reader(input.as_bytes(), &mut output, &ColumnConfig::default())?;
//!
//! assert_eq!(summary.rows_written, 1);
//! assert_eq!(
//!     String::from_utf8(output)?,
//!     "CreationDate,Date,Time,UserId,Operation,Foo,Bar\r\n\
//!      2023-01-01T14:30:00,02-01-2023,00:30:00,bob,Logout,,2\r\n"
//! );
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use serde::Serialize;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub mod normalize;
pub mod paths;
pub mod payload;
pub mod schema;
pub mod source;
pub mod timestamp;
pub mod types;

pub use normalize::{CsvRecordWriter, FileSink, RowNormalizer};
pub use paths::{derive_output_path, sanitize_path};
pub use payload::{extract_pairs, PayloadPairs};
pub use schema::{discover_schema, ColumnSchema, SchemaDiscoverer};
pub use source::RecordReader;
pub use timestamp::{LocalStamp, TimestampError, TimestampLocalizer};
pub use types::{ColumnConfig, NormalizedRecord, RawRecord};

/// Result of the discovery pass
#[derive(Debug, Clone, Serialize)]
pub struct Discovery {
    pub columns: ColumnSchema,
    pub rows_scanned: u64,
}

/// Outcome of a complete conversion
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub columns: ColumnSchema,
    pub rows_discovered: u64,
    pub rows_written: u64,
    pub rows_skipped: u64,
    pub timestamp_failures: u64,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct PassCounts {
    written: u64,
    skipped: u64,
    timestamp_failures: u64,
}

/// Convert `input` into `output`, reading the input file once per pass.
///
/// The output is written to a temporary file and only renamed into place
/// after the last row, so a failed run never leaves a partial file behind.
pub fn columnise_file(input: &Path, output: &Path, config: &ColumnConfig) -> Result<RunSummary> {
    let localizer = TimestampLocalizer::new(config.utc_offset_hours)?;

    let discovery = discover_records(RecordReader::open(input)?, config)?;

    let mut sink = FileSink::create(output)?;
    let counts = write_rows(
        RecordReader::open(input)?,
        &discovery.columns,
        config,
        localizer,
        sink.writer(),
    )?;
    let output = sink.commit()?;

    tracing::info!(
        rows_written = counts.written,
        rows_skipped = counts.skipped,
        output = %output.display(),
        "wrote normalized CSV"
    );

    Ok(summarize(discovery, counts, Some(output)))
}

/// Convert CSV from any reader into any writer, buffering the rows in memory
/// between the two passes.
pub fn columnise_reader<R: Read, W: Write>(
    input: R,
    output: W,
    config: &ColumnConfig,
) -> Result<RunSummary> {
    let localizer = TimestampLocalizer::new(config.utc_offset_hours)?;

    let reader = RecordReader::from_reader(input)?;
    warn_if_payload_missing(&reader, config);
    let records: Vec<RawRecord> = reader.collect::<Result<_>>()?;

    let discovery = Discovery {
        columns: discover_schema(&records, config),
        rows_scanned: records.len() as u64,
    };
    log_discovery(&discovery);

    let mut writer = CsvRecordWriter::new(output);
    let counts = write_rows(
        records.into_iter().map(Ok),
        &discovery.columns,
        config,
        localizer,
        &mut writer,
    )?;

    Ok(summarize(discovery, counts, None))
}

/// Run only the discovery pass over a reader
pub fn discover_records<R: Read>(reader: RecordReader<R>, config: &ColumnConfig) -> Result<Discovery> {
    warn_if_payload_missing(&reader, config);

    let mut discoverer = SchemaDiscoverer::new(config);
    for record in reader {
        discoverer.add_record(&record?);
    }

    let discovery = Discovery {
        rows_scanned: discoverer.rows_scanned(),
        columns: discoverer.build(),
    };
    log_discovery(&discovery);
    Ok(discovery)
}

fn write_rows<I, W>(
    records: I,
    schema: &ColumnSchema,
    config: &ColumnConfig,
    localizer: TimestampLocalizer,
    writer: &mut CsvRecordWriter<W>,
) -> Result<PassCounts>
where
    I: IntoIterator<Item = Result<RawRecord>>,
    W: Write,
{
    writer.write_header(schema)?;

    let normalizer = RowNormalizer::new(schema, config, localizer);
    let mut counts = PassCounts::default();

    for (idx, record) in records.into_iter().enumerate() {
        let record = record?;
        if idx == 0 && config.skip_first_data_row {
            tracing::debug!(row = record.row, "skipping first data row");
            counts.skipped += 1;
            continue;
        }
        writer.write_record(&normalizer.normalize(record))?;
        counts.written += 1;
    }

    writer.flush()?;
    counts.timestamp_failures = normalizer.timestamp_failures();
    Ok(counts)
}

fn summarize(discovery: Discovery, counts: PassCounts, output: Option<PathBuf>) -> RunSummary {
    RunSummary {
        columns: discovery.columns,
        rows_discovered: discovery.rows_scanned,
        rows_written: counts.written,
        rows_skipped: counts.skipped,
        timestamp_failures: counts.timestamp_failures,
        output,
    }
}

fn warn_if_payload_missing<R: Read>(reader: &RecordReader<R>, config: &ColumnConfig) {
    if !reader.has_column(&config.payload_column) {
        tracing::warn!(
            column = %config.payload_column,
            "payload column not in header, no dynamic columns will be found"
        );
    }
}

fn log_discovery(discovery: &Discovery) {
    tracing::info!(
        rows = discovery.rows_scanned,
        columns = discovery.columns.len(),
        "discovered column schema"
    );
}
