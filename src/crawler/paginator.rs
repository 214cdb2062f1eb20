//! Paginator - main scrape orchestration logic
//!
//! This module contains the page loop that coordinates fetching, extraction
//! and aggregation. Pages are processed strictly one after another: a page
//! is fetched and fully extracted before the next request is sent.

use crate::config::{Config, PaginationConfig};
use crate::crawler::aggregator::Aggregator;
use crate::crawler::extractor::Extractor;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::report::{PageOutcome, PageReport, ScrapeReport, StopReason};
use crate::record::ItemRecord;
use crate::url::PageTemplate;
use crate::{ScrapeError, UrlError};
use chrono::Utc;
use std::time::Duration;
use url::Url;

/// Drives fetch + extract across a sequence of catalog pages
pub struct Paginator {
    template: PageTemplate,
    pagination: PaginationConfig,
    fetcher: Fetcher,
    extractor: Extractor,
    page_delay: Duration,
}

impl Paginator {
    /// Creates a paginator from a validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Paginator)` - Ready to run
    /// * `Err(ScrapeError)` - Template, selectors or HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, ScrapeError> {
        Ok(Self::from_parts(
            PageTemplate::new(&config.pagination.url_template)?,
            config.pagination.clone(),
            Fetcher::new(&config.fetcher)?,
            Extractor::new(&config.selectors)?,
            Duration::from_millis(config.fetcher.page_delay_ms),
        ))
    }

    /// Assembles a paginator from already-built components
    pub fn from_parts(
        template: PageTemplate,
        pagination: PaginationConfig,
        fetcher: Fetcher,
        extractor: Extractor,
        page_delay: Duration,
    ) -> Self {
        Self {
            template,
            pagination,
            fetcher,
            extractor,
            page_delay,
        }
    }

    /// Returns the URLs of the first `limit` pages, capped by `max_pages`
    pub fn planned_urls(&self, limit: u32) -> Result<Vec<Url>, UrlError> {
        let count = self.pagination.max_pages.map_or(limit, |max| max.min(limit));
        (0..count)
            .map_while(|offset| self.pagination.start_page.checked_add(offset))
            .map(|page| self.template.page_url(page))
            .collect()
    }

    /// Runs pagination until a stopping condition is met
    ///
    /// # Stopping Conditions
    ///
    /// | Condition | Setting |
    /// |-----------|---------|
    /// | `max_pages` pages requested | `max-pages` |
    /// | A page has no listings | `stop-on-empty-page` |
    /// | N pages in a row fail | `max-consecutive-failures` |
    ///
    /// A page that fails to fetch or parse is logged and skipped; it never
    /// discards records collected from earlier pages. A page whose listings
    /// are all invalid is recorded as rejected and pagination continues.
    ///
    /// # Returns
    ///
    /// * `Ok(ScrapeReport)` - Aggregated records and per-page outcomes
    /// * `Err(ScrapeError)` - A page URL could not be built from the template
    pub async fn run(&self) -> Result<ScrapeReport, ScrapeError> {
        let started_at = Utc::now();
        let mut aggregator = Aggregator::new();
        let mut pages: Vec<PageReport> = Vec::new();
        let mut consecutive_failures = 0u32;
        let mut page = self.pagination.start_page;

        tracing::info!(
            "Starting pagination at page {} of {}",
            page,
            self.template.as_str()
        );

        let stop_reason = loop {
            if let Some(max_pages) = self.pagination.max_pages {
                if pages.len() >= max_pages as usize {
                    break StopReason::MaxPages;
                }
            }

            if !pages.is_empty() && !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }

            let url = self.template.page_url(page)?;
            let outcome = match self.scrape_page(&url).await {
                Ok((0, _)) => {
                    consecutive_failures = 0;
                    tracing::info!("Page {} ({}) has no listings", page, url);
                    PageOutcome::Empty
                }
                Ok((listings, records)) if records.is_empty() => {
                    consecutive_failures = 0;
                    tracing::warn!(
                        "Page {} ({}): none of {} listings could be read",
                        page,
                        url,
                        listings
                    );
                    PageOutcome::Rejected { listings }
                }
                Ok((_, records)) => {
                    consecutive_failures = 0;
                    let found = records.len();
                    let added = aggregator.extend(records);
                    tracing::info!(
                        "Page {}: {} listings, {} new ({} total)",
                        page,
                        found,
                        added,
                        aggregator.len()
                    );
                    PageOutcome::Scraped { found, added }
                }
                Err(e) => {
                    consecutive_failures += 1;
                    tracing::warn!("Skipping page {}: {}", page, e);
                    PageOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };

            let is_empty = outcome == PageOutcome::Empty;
            pages.push(PageReport {
                page,
                url: url.to_string(),
                outcome,
            });

            if is_empty && self.pagination.stop_on_empty_page {
                break StopReason::EmptyPage { page };
            }

            if consecutive_failures >= self.pagination.max_consecutive_failures {
                tracing::error!(
                    "Giving up after {} consecutive failed pages",
                    consecutive_failures
                );
                break StopReason::ConsecutiveFailures {
                    page,
                    failures: consecutive_failures,
                };
            }

            page = match page.checked_add(1) {
                Some(next) => next,
                None => break StopReason::MaxPages,
            };
        };

        let report = ScrapeReport {
            records: aggregator.into_records(),
            pages,
            stop_reason,
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            "Pagination finished ({}): {} pages, {} failed, {} unique records",
            report.stop_reason,
            report.pages_visited(),
            report.pages_failed(),
            report.records.len()
        );

        Ok(report)
    }

    /// Fetches and extracts a single page
    ///
    /// Returns the number of listing containers alongside the valid records.
    async fn scrape_page(&self, url: &Url) -> Result<(usize, Vec<ItemRecord>), ScrapeError> {
        let body = self.fetcher.fetch(url.as_str()).await?;
        let page = self.extractor.parse(&body, url)?;
        Ok((page.container_count(), page.records().collect()))
    }
}

/// Runs a complete scrape from configuration
///
/// # Example
///
/// ```no_run
/// use product_scraper::config::load_config;
/// use product_scraper::crawler::run_scrape;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("scraper.toml"))?;
/// let report = run_scrape(&config).await?;
/// println!("{} products", report.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_scrape(config: &Config) -> Result<ScrapeReport, ScrapeError> {
    let paginator = Paginator::new(config)?;
    paginator.run().await
}
