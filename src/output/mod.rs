//! Output module for extracted records and run statistics
//!
//! This module handles:
//! - The `RecordSink` interface the walker emits into
//! - Writing records as CSV rows
//! - Recording crawl statistics

mod csv_sink;
pub mod stats;
mod traits;

pub use csv_sink::CsvSink;
pub use stats::{print_summary, CrawlSummary};
pub use traits::{MemorySink, OutputError, OutputResult, RecordSink};
