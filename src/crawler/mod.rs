//! Crawler module for listing pagination and product extraction
//!
//! This module contains the core crawling logic, including:
//! - Lightweight HTTP fetching
//! - Product link and count extraction
//! - The retry policy for failed fetches
//! - The browser rendering fallback and its session
//! - The page walker tying them together

mod extractor;
mod fetcher;
mod render;
mod request;
mod retry;
mod session;
mod walker;

pub use extractor::{parse_product_count, Extraction, Extractor};
pub use fetcher::{build_http_client, FetchedPage, Fetcher, HttpFetcher, NetworkError};
#[cfg(feature = "chrome")]
pub use render::ChromeRenderer;
pub use render::{RenderError, RenderSettle, Renderer};
pub use request::{Category, ExtractedRecord, PageRequest};
pub use retry::{RetryDecision, RetryPolicy};
pub use session::CrawlSession;
pub use walker::{PageOutcome, PageWalker};

use crate::config::Config;
use crate::output::{CrawlSummary, CsvSink, RecordSink};
use crate::CrawlError;
use std::path::Path;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client and the page walker
/// 2. Launch the rendering session
/// 3. Open the CSV sink
/// 4. Walk every page up to the ceiling
/// 5. Close the rendering session
///
/// # Arguments
///
/// * `config` - The validated crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl completed
/// * `Err(CrawlError)` - Crawl failed
pub async fn crawl(config: Config) -> Result<CrawlSummary, CrawlError> {
    let fetcher = HttpFetcher::new(&config.fetch)?;
    let walker = PageWalker::from_config(&config, fetcher)?;

    // A failed launch must leave any previous output file untouched
    let session = CrawlSession::launch(&config.render).await?;

    let csv_path = Path::new(&config.output.csv_path);
    let mut sink = match CsvSink::create(csv_path) {
        Ok(sink) => sink,
        Err(e) => {
            if let Err(close_err) = session.close().await {
                tracing::warn!("Failed to close rendering session: {}", close_err);
            }
            return Err(e.into());
        }
    };
    tracing::info!("Writing records to {}", csv_path.display());

    run_walk(&walker, session, &mut sink).await
}

/// Walks with an opened session and closes it whatever the walk's result
///
/// A walk error takes precedence over a close error; the latter is logged.
pub async fn run_walk<F: Fetcher>(
    walker: &PageWalker<F>,
    mut session: CrawlSession,
    sink: &mut dyn RecordSink,
) -> Result<CrawlSummary, CrawlError> {
    let walked = walker.walk(&mut session, sink).await;
    let closed = session.close().await;

    match (walked, closed) {
        (Ok(summary), Ok(())) => Ok(summary),
        (Ok(_), Err(e)) => Err(e.into()),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            tracing::warn!("Failed to close rendering session: {}", close_err);
            Err(e)
        }
    }
}
