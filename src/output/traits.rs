//! Record sink trait and error types
//!
//! The walker hands every `ExtractedRecord` to a `RecordSink` in emission
//! order. What the sink does with the record is its own concern.

use crate::crawler::ExtractedRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write record: {0}")]
    Write(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for extracted records
pub trait RecordSink {
    /// Accepts one record
    fn write_record(&mut self, record: &ExtractedRecord) -> OutputResult<()>;

    /// Flushes anything buffered; called once after the walk
    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

/// Sink that keeps every record in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Vec<ExtractedRecord>,
    finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records received so far, in emission order
    pub fn records(&self) -> &[ExtractedRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ExtractedRecord> {
        self.records
    }

    /// Returns true once `finish` has been called
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl RecordSink for MemorySink {
    fn write_record(&mut self, record: &ExtractedRecord) -> OutputResult<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.finished = true;
        Ok(())
    }
}
