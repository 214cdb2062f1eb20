//! Crawler module for catalog page fetching and processing
//!
//! This module contains the core scraping pipeline:
//! - HTTP fetching with retry logic
//! - HTML parsing and listing extraction
//! - Page sequencing with stopping conditions
//! - De-duplicating aggregation of records

mod aggregator;
mod extractor;
mod fetcher;
mod paginator;
mod report;

pub use aggregator::Aggregator;
pub use extractor::{CompiledSelectors, ExtractedPage, Extractor};
pub use fetcher::{build_http_client, Fetcher};
pub use paginator::{run_scrape, Paginator};
pub use report::{PageOutcome, PageReport, ScrapeReport, StopReason};
