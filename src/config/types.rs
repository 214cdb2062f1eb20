use crate::output::ExportFormat;
use serde::Deserialize;

/// Main configuration structure for Product-Scraper
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Which pages to visit and when to stop
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    /// Page URL template, with an optional `{page}` placeholder
    #[serde(rename = "url-template")]
    pub url_template: String,

    /// First page number
    #[serde(rename = "start-page", default = "default_start_page")]
    pub start_page: u32,

    /// Maximum number of pages to request (unbounded if unset)
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<u32>,

    /// Stop at the first page without listings
    #[serde(rename = "stop-on-empty-page", default = "default_true")]
    pub stop_on_empty_page: bool,

    /// Stop after this many pages fail in a row
    #[serde(
        rename = "max-consecutive-failures",
        default = "default_max_consecutive_failures"
    )]
    pub max_consecutive_failures: u32,
}

/// HTTP client behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Extra attempts after a retryable failure
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Pause between attempts (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,

    /// Pause between consecutive page requests (milliseconds)
    #[serde(rename = "page-delay-ms")]
    pub page_delay_ms: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                .to_string(),
            timeout_secs: 10,
            connect_timeout_secs: 5,
            max_retries: 2,
            retry_delay_ms: 1000,
            page_delay_ms: 0,
        }
    }
}

/// CSS selectors describing one product listing
///
/// Field selectors are evaluated inside each `item` container.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub item: String,
    pub name: String,
    /// Attribute holding the full name; the element text is used when absent
    #[serde(rename = "name-attribute")]
    pub name_attribute: Option<String>,
    pub price: String,
    pub description: String,
    pub rating: String,
    /// Attribute holding the rating; the element text is used when absent
    #[serde(rename = "rating-attribute")]
    pub rating_attribute: Option<String>,
    pub reviews: String,
    pub image: String,
    #[serde(rename = "image-attribute")]
    pub image_attribute: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            item: "div.card-body".to_string(),
            name: "a.title".to_string(),
            name_attribute: Some("title".to_string()),
            price: "h4.price".to_string(),
            description: "p.description".to_string(),
            rating: "p[data-rating]".to_string(),
            rating_attribute: Some("data-rating".to_string()),
            reviews: "p.review-count".to_string(),
            image: "img".to_string(),
            image_attribute: "src".to_string(),
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving export files
    pub directory: String,

    /// File name stem of export files
    #[serde(rename = "file-stem")]
    pub file_stem: String,

    /// Formats written after each run
    pub formats: Vec<ExportFormat>,

    /// Append a `_YYYYmmdd_HHMMSS` timestamp to export file names
    pub timestamped: bool,

    /// Path of the markdown report (not written if unset)
    #[serde(rename = "report-path")]
    pub report_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "./exports".to_string(),
            file_stem: "products".to_string(),
            formats: vec![ExportFormat::Csv, ExportFormat::Json],
            timestamped: true,
            report_path: None,
        }
    }
}

fn default_start_page() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_max_consecutive_failures() -> u32 {
    3
}
