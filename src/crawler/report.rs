//! Per-run and per-page outcomes
//!
//! A [`ScrapeReport`] is what a pagination run returns: the aggregated
//! records plus enough bookkeeping to explain why the run stopped.

use crate::record::ItemRecord;
use chrono::{DateTime, Utc};
use std::fmt;

/// What happened to a single page
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// Page yielded records
    Scraped {
        /// Records extracted from the page
        found: usize,
        /// Records that were not duplicates of earlier ones
        added: usize,
    },

    /// Page parsed but held no listings
    Empty,

    /// Page held listings but none of them produced a valid record
    Rejected {
        /// Listing containers found on the page
        listings: usize,
    },

    /// Page could not be fetched or parsed and was skipped
    Failed {
        /// Error description
        error: String,
    },
}

impl PageOutcome {
    /// Returns true if the page was fetched and parsed
    pub fn is_success(&self) -> bool {
        !self.is_error()
    }

    /// Returns true if the page was skipped because of an error
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scraped { found, added } => write!(f, "{} found, {} new", found, added),
            Self::Empty => write!(f, "empty"),
            Self::Rejected { listings } => write!(f, "{} listings, none valid", listings),
            Self::Failed { error } => write!(f, "failed: {}", error),
        }
    }
}

/// One visited page
#[derive(Debug, Clone)]
pub struct PageReport {
    pub page: u32,
    pub url: String,
    pub outcome: PageOutcome,
}

/// Why pagination ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The configured page limit was reached
    MaxPages,

    /// A page held no listings (end of catalog)
    EmptyPage { page: u32 },

    /// Too many pages failed in a row
    ConsecutiveFailures { page: u32, failures: u32 },
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxPages => write!(f, "page limit reached"),
            Self::EmptyPage { page } => write!(f, "page {} was empty", page),
            Self::ConsecutiveFailures { page, failures } => {
                write!(f, "{} consecutive failures ending at page {}", failures, page)
            }
        }
    }
}

/// Result of a pagination run
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    /// De-duplicated records in page and document order
    pub records: Vec<ItemRecord>,
    pub pages: Vec<PageReport>,
    pub stop_reason: StopReason,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ScrapeReport {
    /// Number of pages requested
    pub fn pages_visited(&self) -> usize {
        self.pages.len()
    }

    /// Number of pages skipped because of errors
    pub fn pages_failed(&self) -> usize {
        self.pages.iter().filter(|p| p.outcome.is_error()).count()
    }

    /// Total records extracted before de-duplication
    pub fn records_found(&self) -> usize {
        self.pages
            .iter()
            .map(|p| match p.outcome {
                PageOutcome::Scraped { found, .. } => found,
                _ => 0,
            })
            .sum()
    }

    /// Wall-clock duration of the run in seconds
    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}
