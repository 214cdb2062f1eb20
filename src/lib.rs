//! Product-Scraper: a paginated product catalog scraper
//!
//! This crate fetches catalog pages over HTTP, extracts product listings with
//! CSS selectors, de-duplicates them across pages and exports the result as
//! CSV or JSON together with summary statistics.

pub mod catalog;
pub mod config;
pub mod crawler;
pub mod output;
pub mod record;
pub mod url;

use thiserror::Error;

/// Main error type for Product-Scraper operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Errors raised while fetching a single page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    /// Returns true if another attempt at the same URL may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Http { source, .. } => source.is_connect() || source.is_body(),
        }
    }
}

/// Errors raised for page bodies that cannot be treated as markup
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Empty page body for {url}")]
    EmptyBody { url: String },

    #[error("Page body for {url} contains no markup")]
    NotMarkup { url: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Product-Scraper operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Aggregator, ScrapeReport};
pub use record::ItemRecord;
