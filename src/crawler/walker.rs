//! Page walker - listing pagination and per-page orchestration
//!
//! The walker requests listing pages one at a time in increasing order. For
//! each page it:
//! - Fetches the page, retrying failed requests under the `RetryPolicy`
//! - Hands the raw HTML to the page cache
//! - Extracts product links and the product count
//! - Falls back to the rendering session when no links were found
//! - Emits one record per product link to the sink
//!
//! Page i+1 is never requested before page i has finished.

use crate::cache::{FsPageCache, PageCache};
use crate::config::{Config, ExhaustionPolicy};
use crate::crawler::extractor::Extractor;
use crate::crawler::fetcher::{FetchedPage, Fetcher};
use crate::crawler::request::{Category, ExtractedRecord, PageRequest};
use crate::crawler::retry::{RetryDecision, RetryPolicy};
use crate::crawler::session::CrawlSession;
use crate::output::{CrawlSummary, RecordSink};
use crate::state::{PageState, PageTracker};
use crate::url::{resolve_link, PageUrlTemplate};
use crate::{ConfigError, CrawlError};

/// How a single page ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Records were emitted for the page
    ///
    /// `skipped` counts links that did not resolve to an http(s) URL.
    Emitted {
        records: usize,
        skipped: usize,
        via_fallback: bool,
    },

    /// The rendered page had no product links either
    FallbackEmpty,

    /// The rendering engine failed on this page
    FallbackFailed { reason: String },

    /// Every request for the page failed
    Exhausted { attempts: u32 },
}

impl PageOutcome {
    /// Returns true if the page produced no records
    pub fn is_abandoned(&self) -> bool {
        !matches!(self, Self::Emitted { .. })
    }
}

/// Walks a paginated listing from its first page to its ceiling
pub struct PageWalker<F: Fetcher> {
    fetcher: F,
    extractor: Extractor,
    retry: RetryPolicy,
    template: PageUrlTemplate,
    first_page: u32,
    page_ceiling: u32,
    category: Category,
    on_exhausted: ExhaustionPolicy,
    cache: Option<Box<dyn PageCache>>,
}

impl<F: Fetcher> PageWalker<F> {
    /// Creates a walker over pages 1..=285 with the default retry policy
    pub fn new(
        fetcher: F,
        extractor: Extractor,
        template: PageUrlTemplate,
        category: Category,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            retry: RetryPolicy::default(),
            template,
            first_page: 1,
            page_ceiling: 285,
            category,
            on_exhausted: ExhaustionPolicy::Continue,
            cache: None,
        }
    }

    /// Builds a walker from configuration
    ///
    /// The page cache is attached when `output.cache-dir` is set.
    pub fn from_config(config: &Config, fetcher: F) -> Result<Self, CrawlError> {
        let template = PageUrlTemplate::parse(&config.crawl.seed_url_template)?;
        let extractor = Extractor::new(&config.selectors)?;
        let category = Category::new(config.category.name.clone(), config.category.url.clone());

        let mut walker = Self::new(fetcher, extractor, template, category)
            .with_pages(config.crawl.first_page, config.crawl.page_ceiling)
            .with_retry_policy(RetryPolicy::from_config(&config.retry))
            .with_exhaustion_policy(config.crawl.on_exhausted);

        if let Some(dir) = &config.output.cache_dir {
            walker = walker.with_cache(Box::new(FsPageCache::new(dir)));
        }

        Ok(walker)
    }

    /// Sets the first page and the inclusive ceiling
    pub fn with_pages(mut self, first_page: u32, page_ceiling: u32) -> Self {
        self.first_page = first_page;
        self.page_ceiling = page_ceiling;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_exhaustion_policy(mut self, policy: ExhaustionPolicy) -> Self {
        self.on_exhausted = policy;
        self
    }

    pub fn with_cache(mut self, cache: Box<dyn PageCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Walks every page and returns the run statistics
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSummary)` - The walk reached the ceiling or was halted by
    ///   the exhaustion policy
    /// * `Err(CrawlError)` - A page URL could not be built, the sink failed,
    ///   or the page state machine was violated
    pub async fn walk(
        &self,
        session: &mut CrawlSession,
        sink: &mut dyn RecordSink,
    ) -> Result<CrawlSummary, CrawlError> {
        if self.first_page < 1 || self.first_page > self.page_ceiling {
            return Err(ConfigError::Validation(format!(
                "page range {}..={} is empty",
                self.first_page, self.page_ceiling
            ))
            .into());
        }

        tracing::info!(
            "Walking pages {}..={} of {}",
            self.first_page,
            self.page_ceiling,
            self.category.name
        );

        let mut summary = CrawlSummary::new();
        let mut page_number = self.first_page;

        loop {
            let outcome = self
                .walk_page(page_number, session, sink, &mut summary)
                .await?;

            summary.pages_visited += 1;
            summary.last_page = Some(page_number);
            match &outcome {
                PageOutcome::Emitted { .. } => summary.pages_emitted += 1,
                PageOutcome::FallbackEmpty | PageOutcome::FallbackFailed { .. } => {
                    summary.pages_fallback_empty += 1
                }
                PageOutcome::Exhausted { .. } => summary.pages_exhausted += 1,
            }

            if matches!(outcome, PageOutcome::Exhausted { .. })
                && self.on_exhausted == ExhaustionPolicy::Halt
            {
                tracing::error!("Halting crawl: page {} exhausted its retries", page_number);
                summary.halted_at = Some(page_number);
                break;
            }

            if page_number >= self.page_ceiling {
                tracing::info!("Reached page ceiling {}", self.page_ceiling);
                break;
            }

            if summary.pages_visited % 10 == 0 {
                tracing::info!(
                    "Progress: {} pages walked, {} records emitted, {} abandoned",
                    summary.pages_visited,
                    summary.records_emitted,
                    summary.pages_abandoned()
                );
            }

            page_number += 1;
        }

        sink.finish()?;
        summary.finish();

        tracing::info!(
            "Walk finished: {} records from {} pages ({} abandoned)",
            summary.records_emitted,
            summary.pages_visited,
            summary.pages_abandoned()
        );

        Ok(summary)
    }

    /// Processes one page from first request to final outcome
    async fn walk_page(
        &self,
        page_number: u32,
        session: &mut CrawlSession,
        sink: &mut dyn RecordSink,
        summary: &mut CrawlSummary,
    ) -> Result<PageOutcome, CrawlError> {
        let mut tracker = PageTracker::new(page_number);
        let mut request = PageRequest::new(self.template.url_for(page_number)?, page_number);

        let fetched = loop {
            summary.requests_issued += 1;
            if !request.is_first_attempt() {
                summary.retries += 1;
            }

            match self.fetcher.fetch(&request.url).await {
                Ok(page) => break page,
                Err(e) => {
                    tracing::warn!(
                        "Fetch failed for page {} (attempt {}): {}",
                        page_number,
                        request.retry_count + 1,
                        e
                    );

                    match self.retry.decide(&request) {
                        RetryDecision::Retry(next) => {
                            tracker.advance(PageState::Fetching)?;
                            if !self.retry.delay().is_zero() {
                                tokio::time::sleep(self.retry.delay()).await;
                            }
                            request = next;
                        }
                        RetryDecision::Exhausted { attempts, .. } => {
                            tracker.advance(PageState::Exhausted)?;
                            tracing::error!(
                                "Failed to retrieve page {} after {} retries",
                                page_number,
                                self.retry.max_retries()
                            );
                            return Ok(PageOutcome::Exhausted { attempts });
                        }
                    }
                }
            }
        };

        tracker.advance(PageState::Extracting)?;
        self.cache_page(&fetched);

        let extraction = self.extractor.extract(&fetched.body);
        let product_count = extraction.product_count;

        let (links, base_url, via_fallback) = if extraction.is_empty() {
            tracker.advance(PageState::NeedsFallback)?;
            tracing::warn!(
                "No product links found on page {}, using rendering fallback",
                page_number
            );
            summary.fallbacks_triggered += 1;

            tracker.advance(PageState::FallbackRendering)?;
            match session
                .render_links(&request.url, self.extractor.link_selector())
                .await
            {
                Ok(hrefs) if !hrefs.is_empty() => {
                    summary.fallbacks_recovered += 1;
                    (hrefs, request.url.clone(), true)
                }
                Ok(_) => {
                    tracker.advance(PageState::FallbackEmpty)?;
                    tracing::error!(
                        "No product links found on page {} even after rendering fallback",
                        page_number
                    );
                    return Ok(PageOutcome::FallbackEmpty);
                }
                Err(e) => {
                    tracker.advance(PageState::FallbackEmpty)?;
                    tracing::error!("Rendering fallback failed on page {}: {}", page_number, e);
                    return Ok(PageOutcome::FallbackFailed {
                        reason: e.to_string(),
                    });
                }
            }
        } else {
            (extraction.links, fetched.final_url.clone(), false)
        };

        tracker.advance(PageState::Emitting)?;
        let mut records = 0;
        let mut skipped = 0;
        for href in &links {
            let Some(product_url) = resolve_link(href, &base_url) else {
                tracing::debug!("Skipping unresolvable link on page {}: {}", page_number, href);
                skipped += 1;
                continue;
            };

            let record = ExtractedRecord::new(product_url, product_count, &self.category);
            sink.write_record(&record)?;
            records += 1;
        }
        summary.records_emitted += records as u64;
        summary.links_skipped += skipped as u64;
        tracker.advance(PageState::Emitted)?;

        if skipped > 0 {
            tracing::warn!(
                "Page {}: skipped {} of {} product links that are not http(s) URLs",
                page_number,
                skipped,
                links.len()
            );
        }

        tracing::debug!(
            "Page {}: {} records (count label {}{})",
            page_number,
            records,
            product_count,
            if via_fallback { ", rendered" } else { "" }
        );

        Ok(PageOutcome::Emitted {
            records,
            skipped,
            via_fallback,
        })
    }

    fn cache_page(&self, fetched: &FetchedPage) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.store(&fetched.final_url, &fetched.body) {
                tracing::warn!("Failed to cache {}: {}", fetched.final_url, e);
            }
        }
    }
}
