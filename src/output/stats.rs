//! Crawl statistics
//!
//! `CrawlSummary` is filled in by the walker as pages complete and printed
//! once at the end of a run.

use chrono::{DateTime, Utc};

/// Summary statistics for a walk
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    // Run metadata
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    // Page outcomes
    pub pages_visited: u64,
    pub pages_emitted: u64,
    pub pages_fallback_empty: u64,
    pub pages_exhausted: u64,

    // Request accounting
    pub requests_issued: u64,
    pub retries: u64,

    // Fallback accounting
    pub fallbacks_triggered: u64,
    pub fallbacks_recovered: u64,

    pub records_emitted: u64,

    /// Product links dropped because they were not http(s) URLs
    pub links_skipped: u64,

    /// Last page number the walk reached
    pub last_page: Option<u32>,

    /// Page after which the walk stopped early
    pub halted_at: Option<u32>,
}

impl CrawlSummary {
    /// Starts a summary stamped with the current time
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            pages_visited: 0,
            pages_emitted: 0,
            pages_fallback_empty: 0,
            pages_exhausted: 0,
            requests_issued: 0,
            retries: 0,
            fallbacks_triggered: 0,
            fallbacks_recovered: 0,
            records_emitted: 0,
            links_skipped: 0,
            last_page: None,
            halted_at: None,
        }
    }

    /// Stamps the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Pages that produced no records
    pub fn pages_abandoned(&self) -> u64 {
        self.pages_fallback_empty + self.pages_exhausted
    }

    /// Returns true if the walk stopped before the ceiling
    pub fn was_halted(&self) -> bool {
        self.halted_at.is_some()
    }

    /// Returns the share of visited pages that emitted records as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.pages_visited == 0 {
            return 0.0;
        }
        (self.pages_emitted as f64 / self.pages_visited as f64) * 100.0
    }

    /// Returns the run duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

impl Default for CrawlSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints the summary to stdout in a formatted manner
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    println!("Run:");
    println!("  Started: {}", summary.started_at.to_rfc3339());
    if let Some(finished) = summary.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(seconds) = summary.duration_seconds() {
        println!("  Duration: {}s", seconds);
    }
    if let Some(page) = summary.last_page {
        println!("  Last page: {}", page);
    }
    if let Some(page) = summary.halted_at {
        println!("  Halted after page {}", page);
    }
    println!();

    println!("Pages:");
    println!("  Visited: {}", summary.pages_visited);
    println!(
        "  Emitted: {} ({:.1}%)",
        summary.pages_emitted,
        summary.success_rate()
    );
    println!("  Empty after fallback: {}", summary.pages_fallback_empty);
    println!("  Out of retries: {}", summary.pages_exhausted);
    println!();

    println!("Requests:");
    println!("  Issued: {}", summary.requests_issued);
    println!("  Retries: {}", summary.retries);
    println!(
        "  Fallbacks: {} triggered, {} recovered",
        summary.fallbacks_triggered, summary.fallbacks_recovered
    );
    println!();

    println!("Records emitted: {}", summary.records_emitted);
    if summary.links_skipped > 0 {
        println!("Links skipped: {}", summary.links_skipped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_summary_is_empty() {
        let summary = CrawlSummary::new();
        assert_eq!(summary.pages_visited, 0);
        assert_eq!(summary.records_emitted, 0);
        assert_eq!(summary.links_skipped, 0);
        assert!(summary.finished_at.is_none());
        assert!(!summary.was_halted());
    }

    #[test]
    fn test_pages_abandoned() {
        let mut summary = CrawlSummary::new();
        summary.pages_fallback_empty = 2;
        summary.pages_exhausted = 1;
        assert_eq!(summary.pages_abandoned(), 3);
    }

    #[test]
    fn test_success_rate() {
        let mut summary = CrawlSummary::new();
        summary.pages_visited = 80;
        summary.pages_emitted = 60;

        let rate = summary.success_rate();
        assert!((rate - 75.0).abs() < 0.01);
    }

    #[test]
    fn test_success_rate_zero_pages() {
        let summary = CrawlSummary::new();
        assert_eq!(summary.success_rate(), 0.0);
    }

    #[test]
    fn test_duration_after_finish() {
        let mut summary = CrawlSummary::new();
        assert!(summary.duration_seconds().is_none());

        summary.finish();
        assert!(summary.duration_seconds().unwrap() >= 0);
    }
}
