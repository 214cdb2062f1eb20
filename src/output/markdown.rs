//! Markdown report generation
//!
//! This module generates a human-readable markdown report of a scrape,
//! including run information, catalog metrics and product rankings.

use crate::catalog::{best_value, most_expensive, top_rated};
use crate::crawler::ScrapeReport;
use crate::output::stats::{compute_statistics, CatalogStatistics};
use crate::output::traits::OutputResult;
use crate::record::ItemRecord;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const TOP_RATED_COUNT: usize = 10;
const MOST_EXPENSIVE_COUNT: usize = 5;
const BEST_VALUE_COUNT: usize = 10;

/// Writes a markdown report to a file
///
/// # Arguments
///
/// * `records` - The records to report on (after any filtering)
/// * `scrape` - The run that produced them, if the report follows a scrape
/// * `config_hash` - Hash of the configuration file used for the run
/// * `output_path` - Path where the markdown file should be written
pub fn generate_markdown_report(
    records: &[ItemRecord],
    scrape: Option<&ScrapeReport>,
    config_hash: Option<&str>,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_report(records, scrape, config_hash);

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a markdown report
pub fn format_markdown_report(
    records: &[ItemRecord],
    scrape: Option<&ScrapeReport>,
    config_hash: Option<&str>,
) -> String {
    let stats = compute_statistics(records);
    let mut md = String::new();

    md.push_str("# Product Catalog Report\n\n");

    if let Some(scrape) = scrape {
        push_run_information(&mut md, scrape, config_hash);
    }

    push_overview(&mut md, &stats);

    if !records.is_empty() {
        md.push_str("## Top Rated\n\n");
        push_record_table(&mut md, &top_rated(records, TOP_RATED_COUNT));

        md.push_str("## Most Expensive\n\n");
        push_record_table(&mut md, &most_expensive(records, MOST_EXPENSIVE_COUNT));

        md.push_str("## Best Value (High Rating, Low Price)\n\n");
        push_record_table(&mut md, &best_value(records, BEST_VALUE_COUNT));
    }

    md
}

fn push_run_information(md: &mut String, scrape: &ScrapeReport, config_hash: Option<&str>) {
    md.push_str("## Run Information\n\n");
    md.push_str(&format!(
        "- **Started**: {}\n",
        scrape.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!(
        "- **Finished**: {}\n",
        scrape.finished_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!(
        "- **Duration**: {:.1} seconds\n",
        scrape.duration_seconds()
    ));
    md.push_str(&format!("- **Stopped because**: {}\n", scrape.stop_reason));
    if let Some(hash) = config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push_str(&format!(
        "- **Pages**: {} visited, {} failed\n",
        scrape.pages_visited(),
        scrape.pages_failed()
    ));
    md.push_str(&format!(
        "- **Listings**: {} found, {} unique\n\n",
        scrape.records_found(),
        scrape.records.len()
    ));

    md.push_str("| Page | URL | Outcome |\n");
    md.push_str("|------|-----|---------|\n");
    for page in &scrape.pages {
        md.push_str(&format!(
            "| {} | {} | {} |\n",
            page.page,
            page.url,
            escape_cell(&page.outcome.to_string())
        ));
    }
    md.push('\n');
}

fn push_overview(md: &mut String, stats: &CatalogStatistics) {
    md.push_str("## Key Metrics\n\n");
    md.push_str(&format!("- **Total Products**: {}\n", stats.total_products));
    md.push_str(&format!(
        "- **Average Price**: {}\n",
        format_money(stats.average_price())
    ));
    md.push_str(&format!(
        "- **Average Rating**: {}\n",
        stats
            .average_rating
            .map_or_else(|| "n/a".to_string(), |r| format!("{:.1}", r))
    ));
    md.push_str(&format!("- **Total Reviews**: {}\n\n", stats.total_reviews));

    if let Some(price) = &stats.price {
        md.push_str("## Price Statistics\n\n");
        md.push_str("| Metric | Value |\n");
        md.push_str("|--------|-------|\n");
        md.push_str(&format!("| Minimum | {} |\n", format_money(Some(price.min))));
        md.push_str(&format!("| Maximum | {} |\n", format_money(Some(price.max))));
        md.push_str(&format!("| Average | {} |\n", format_money(Some(price.mean))));
        md.push_str(&format!("| Median | {} |\n", format_money(Some(price.median))));
        md.push_str(&format!("| Std Dev | {} |\n\n", format_money(price.std_dev)));
    }

    if !stats.rating_distribution.is_empty() {
        md.push_str("## Rating Distribution\n\n");
        md.push_str("| Stars | Products |\n");
        md.push_str("|-------|----------|\n");
        for (stars, count) in &stats.rating_distribution {
            md.push_str(&format!("| {} | {} |\n", stars, count));
        }
        md.push('\n');
    }
}

fn push_record_table(md: &mut String, records: &[&ItemRecord]) {
    if records.is_empty() {
        md.push_str("*No qualifying products.*\n\n");
        return;
    }

    md.push_str("| Name | Price | Rating | Reviews |\n");
    md.push_str("|------|-------|--------|---------|\n");
    for record in records {
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            escape_cell(record.name()),
            format_money(record.price()),
            record
                .rating()
                .map_or_else(|| "-".to_string(), |r| format!("{:.1}", r)),
            record
                .reviews()
                .map_or_else(|| "-".to_string(), |r| r.to_string())
        ));
    }
    md.push('\n');
}

fn format_money(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("${:.2}", v))
}

/// Keeps table cells on one line and escapes column separators
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
