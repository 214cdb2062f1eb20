//! Product-Scraper main entry point
//!
//! This is the command-line interface for the Product-Scraper catalog scraper.

use anyhow::{bail, Context};
use chrono::Local;
use clap::Parser;
use product_scraper::catalog::{sort_records, RecordFilter, SortKey, SortOrder};
use product_scraper::config::{load_config_with_hash, Config};
use product_scraper::crawler::Paginator;
use product_scraper::output::{
    compute_statistics, export_records, generate_markdown_report, print_statistics, read_export,
};
use product_scraper::record::{ItemRecord, MAX_RATING};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Number of page URLs listed by --dry-run when no page limit is configured
const DRY_RUN_PREVIEW_PAGES: u32 = 10;

/// Product-Scraper: a paginated product catalog scraper
///
/// Product-Scraper walks the pages of an online catalog, extracts product
/// listings (name, price, rating, description, image, reviews), removes
/// duplicates and exports the result as CSV and/or JSON.
#[derive(Parser, Debug)]
#[command(name = "product-scraper")]
#[command(version = "1.0.0")]
#[command(about = "A paginated product catalog scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG", required_unless_present = "stats")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show which pages would be fetched without fetching them
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Print statistics of an existing CSV or JSON export and exit
    #[arg(long, value_name = "EXPORT")]
    stats: Option<PathBuf>,

    /// Override the page URL template from the config
    #[arg(long, value_name = "TEMPLATE")]
    url: Option<String>,

    /// Override the maximum number of pages from the config
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Keep only products priced at or above this value
    #[arg(long, value_name = "PRICE")]
    min_price: Option<f64>,

    /// Keep only products priced at or below this value
    #[arg(long, value_name = "PRICE")]
    max_price: Option<f64>,

    /// Keep only products with this star rating (repeatable)
    #[arg(long = "rating", value_name = "STARS")]
    ratings: Vec<u8>,

    /// Order products by name, price, rating or reviews
    #[arg(long, value_name = "KEY")]
    sort_by: Option<SortKey>,

    /// Sort in descending order
    #[arg(long, requires = "sort_by")]
    descending: bool,
}

impl Cli {
    fn record_filter(&self) -> anyhow::Result<RecordFilter> {
        if let Some(stars) = self.ratings.iter().find(|&&s| f64::from(s) > MAX_RATING) {
            bail!("--rating must be between 0 and {}, got {}", MAX_RATING, stars);
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                bail!("--min-price ({}) is greater than --max-price ({})", min, max);
            }
        }

        Ok(RecordFilter {
            min_price: self.min_price,
            max_price: self.max_price,
            ratings: self.ratings.iter().copied().collect(),
        })
    }

    /// Applies filters and ordering to a record collection
    fn select_records(&self, records: Vec<ItemRecord>) -> anyhow::Result<Vec<ItemRecord>> {
        let filter = self.record_filter()?;
        let total = records.len();
        let mut selected = filter.apply(records);
        if !filter.is_empty() {
            tracing::info!("Filters kept {} of {} products", selected.len(), total);
        }

        if let Some(key) = self.sort_by {
            let order = if self.descending {
                SortOrder::Descending
            } else {
                SortOrder::Ascending
            };
            sort_records(&mut selected, key, order);
        }

        Ok(selected)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Some(export) = &cli.stats {
        return handle_stats(&cli, export);
    }

    let config_path = cli
        .config
        .as_deref()
        .context("a configuration file is required")?;

    tracing::info!("Loading configuration from: {}", config_path.display());
    let (mut config, config_hash) = load_config_with_hash(config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    apply_overrides(&cli, &mut config)?;

    if cli.dry_run {
        handle_dry_run(&config)
    } else {
        handle_scrape(&cli, &config, &config_hash).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("product_scraper=info,warn"),
            1 => EnvFilter::new("product_scraper=debug,info"),
            2 => EnvFilter::new("product_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command-line overrides and re-validates the configuration
fn apply_overrides(cli: &Cli, config: &mut Config) -> anyhow::Result<()> {
    if let Some(url) = &cli.url {
        config.pagination.url_template = url.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.pagination.max_pages = Some(max_pages);
    }

    if cli.url.is_some() || cli.max_pages.is_some() {
        product_scraper::config::validate(config).context("invalid command-line override")?;
    }

    Ok(())
}

/// Handles the --dry-run mode: validates config and shows what would be fetched
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Product-Scraper Dry Run ===\n");

    println!("Pagination:");
    println!("  URL template: {}", config.pagination.url_template);
    println!("  Start page: {}", config.pagination.start_page);
    match config.pagination.max_pages {
        Some(max) => println!("  Max pages: {}", max),
        None => println!("  Max pages: unlimited"),
    }
    println!(
        "  Stop on empty page: {}",
        config.pagination.stop_on_empty_page
    );
    println!(
        "  Max consecutive failures: {}",
        config.pagination.max_consecutive_failures
    );

    println!("\nFetcher:");
    println!("  User agent: {}", config.fetcher.user_agent);
    println!("  Timeout: {}s", config.fetcher.timeout_secs);
    println!(
        "  Retries: {} ({}ms apart)",
        config.fetcher.max_retries, config.fetcher.retry_delay_ms
    );

    println!("\nSelectors:");
    println!("  Item: {}", config.selectors.item);
    println!("  Name: {}", config.selectors.name);
    println!("  Price: {}", config.selectors.price);
    println!("  Description: {}", config.selectors.description);
    println!("  Rating: {}", config.selectors.rating);
    println!("  Reviews: {}", config.selectors.reviews);
    println!("  Image: {}", config.selectors.image);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    let formats: Vec<String> = config.output.formats.iter().map(|f| f.to_string()).collect();
    println!("  Formats: {}", formats.join(", "));
    if let Some(report) = &config.output.report_path {
        println!("  Report: {}", report);
    }

    let paginator = Paginator::new(config)?;
    let urls = paginator.planned_urls(DRY_RUN_PREVIEW_PAGES)?;
    println!("\nPages ({} shown):", urls.len());
    for url in &urls {
        println!("  - {}", url);
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the --stats mode: prints statistics of an export file
fn handle_stats(cli: &Cli, export: &Path) -> anyhow::Result<()> {
    let records =
        read_export(export).with_context(|| format!("failed to read {}", export.display()))?;
    println!("Export: {} ({} records)\n", export.display(), records.len());

    let records = cli.select_records(records)?;
    print_statistics(&compute_statistics(&records));
    Ok(())
}

/// Handles the main scrape operation
async fn handle_scrape(cli: &Cli, config: &Config, config_hash: &str) -> anyhow::Result<()> {
    let paginator = Paginator::new(config)?;
    let report = paginator.run().await.context("scrape failed")?;

    if report.records.is_empty() {
        tracing::warn!("No products were scraped ({})", report.stop_reason);
    }

    let records = cli.select_records(report.records.clone())?;

    let written = export_records(&records, &config.output, Local::now())
        .context("failed to write export files")?;
    for path in &written {
        println!("✓ Exported {} products to {}", records.len(), path.display());
    }

    if let Some(report_path) = &config.output.report_path {
        generate_markdown_report(&records, Some(&report), Some(config_hash), Path::new(report_path))
            .with_context(|| format!("failed to write report {}", report_path))?;
        println!("✓ Report written to {}", report_path);
    }

    println!();
    print_statistics(&compute_statistics(&records));
    Ok(())
}
