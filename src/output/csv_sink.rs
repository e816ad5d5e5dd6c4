//! CSV record sink
//!
//! Writes one row per record under the header
//! `Product URL,Product Count,Category Name,Category URL`.

use crate::crawler::ExtractedRecord;
use crate::output::traits::{OutputResult, RecordSink};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Sink writing delimited rows
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    rows: u64,
}

impl CsvSink<File> {
    /// Creates (or truncates) the file at `path`
    pub fn create(path: &Path) -> OutputResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self::from_writer(File::create(path)?))
    }
}

impl<W: Write> CsvSink<W> {
    /// Wraps any writer; the header is written with the first record
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
            rows: 0,
        }
    }

    /// Rows written so far
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Flushes and returns the underlying writer
    pub fn into_inner(self) -> OutputResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::output::OutputError::Write(e.to_string()))
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn write_record(&mut self, record: &ExtractedRecord) -> OutputResult<()> {
        self.writer.serialize(record)?;
        self.rows += 1;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        tracing::debug!("CSV sink flushed {} rows", self.rows);
        Ok(())
    }
}
