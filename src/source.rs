use crate::types::RawRecord;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const UTF8_BOM: char = '\u{feff}';

/// Reads CSV data rows as [`RawRecord`]s keyed by the header row
pub struct RecordReader<R: Read> {
    reader: csv::Reader<R>,
    headers: Vec<String>,
    buffer: StringRecord,
    row: u64,
}

impl RecordReader<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open input file: {}", path.display()))?;
        Self::from_reader(file)
    }
}

impl<R: Read> RecordReader<R> {
    pub fn from_reader(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader
            .headers()
            .context("Failed to read CSV header")?
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                if idx == 0 {
                    name.trim_start_matches(UTF8_BOM).to_string()
                } else {
                    name.to_string()
                }
            })
            .collect();

        Ok(RecordReader {
            reader,
            headers,
            buffer: StringRecord::new(),
            row: 0,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|name| name == column)
    }

    /// Read the next data row, or `None` at end of input.
    ///
    /// Fields past the end of a short row are absent from the record;
    /// fields beyond the header width are dropped.
    pub fn next_record(&mut self) -> Result<Option<RawRecord>> {
        let more = self
            .reader
            .read_record(&mut self.buffer)
            .with_context(|| format!("Failed to read CSV record {}", self.row + 1))?;
        if !more {
            return Ok(None);
        }

        self.row += 1;
        let fields: HashMap<String, String> = self
            .headers
            .iter()
            .zip(self.buffer.iter())
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect();

        Ok(Some(RawRecord::new(self.row, fields)))
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}
