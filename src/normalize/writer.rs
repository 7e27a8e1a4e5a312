use crate::schema::ColumnSchema;
use crate::types::NormalizedRecord;
use anyhow::{anyhow, Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Writes normalized records as CSV rows
pub struct CsvRecordWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvRecordWriter<W> {
    pub fn new(writer: W) -> Self {
        CsvRecordWriter {
            writer: csv::WriterBuilder::new()
                .terminator(csv::Terminator::CRLF)
                .from_writer(writer),
        }
    }

    pub fn write_header(&mut self, schema: &ColumnSchema) -> Result<()> {
        self.writer
            .write_record(schema.iter())
            .context("Failed to write CSV header")
    }

    pub fn write_record(&mut self, record: &NormalizedRecord) -> Result<()> {
        self.writer
            .write_record(record.values())
            .context("Failed to write CSV record")
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush CSV writer")
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|err| anyhow!("Failed to flush CSV writer: {}", err.error()))
    }
}

/// CSV output that only appears at its target path once fully written.
///
/// Rows go to a temporary file beside the target, which is renamed over it
/// in [`FileSink::commit`]. Dropping the sink without committing removes the
/// temporary file and leaves any existing target untouched.
pub struct FileSink {
    writer: CsvRecordWriter<NamedTempFile>,
    target: PathBuf,
}

impl FileSink {
    pub fn create<P: AsRef<Path>>(target: P) -> Result<Self> {
        let target = target.as_ref().to_path_buf();
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let temp = NamedTempFile::new_in(&dir)
            .with_context(|| format!("Failed to create output file in {}", dir.display()))?;

        Ok(FileSink {
            writer: CsvRecordWriter::new(temp),
            target,
        })
    }

    pub fn writer(&mut self) -> &mut CsvRecordWriter<NamedTempFile> {
        &mut self.writer
    }

    /// Flush all rows and move the file into place
    pub fn commit(self) -> Result<PathBuf> {
        let temp = self.writer.into_inner()?;
        temp.as_file()
            .sync_all()
            .context("Failed to sync output file")?;
        temp.persist(&self.target)
            .with_context(|| format!("Failed to persist output file: {}", self.target.display()))?;
        Ok(self.target)
    }
}
