//! Output module for exporting and summarizing scraped records
//!
//! This module handles:
//! - Writing records to CSV and JSON export files
//! - Reading export files back into records
//! - Computing and printing catalog statistics
//! - Generating markdown reports

mod csv_export;
mod json_export;
mod markdown;
pub mod stats;
mod traits;

pub use csv_export::CsvExporter;
pub use json_export::JsonExporter;
pub use markdown::{format_markdown_report, generate_markdown_report};
pub use stats::{compute_statistics, print_statistics, CatalogStatistics, PriceStatistics};
pub use traits::{OutputError, OutputResult, RecordExporter};

use crate::config::OutputConfig;
use crate::record::ItemRecord;
use chrono::{DateTime, Local};
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Supported export file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// File extension used for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// Infers the format from a file extension
    pub fn from_path(path: &Path) -> OutputResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        extension.parse()
    }

    /// Returns the exporter implementing this format
    pub fn exporter(&self) -> Box<dyn RecordExporter> {
        match self {
            Self::Csv => Box::new(CsvExporter),
            Self::Json => Box::new(JsonExporter),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(OutputError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Builds the path of an export file
///
/// With a timestamp the file is named `<stem>_<YYYYmmdd_HHMMSS>.<ext>`,
/// otherwise `<stem>.<ext>`.
pub fn export_path(
    directory: &Path,
    stem: &str,
    format: ExportFormat,
    timestamp: Option<DateTime<Local>>,
) -> PathBuf {
    let file_name = match timestamp {
        Some(ts) => format!(
            "{}_{}.{}",
            stem,
            ts.format("%Y%m%d_%H%M%S"),
            format.extension()
        ),
        None => format!("{}.{}", stem, format.extension()),
    };
    directory.join(file_name)
}

/// Writes records to a file in the given format, creating parent directories
pub fn write_export(records: &[ItemRecord], format: ExportFormat, path: &Path) -> OutputResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    format.exporter().write_records(records, &mut writer)?;

    tracing::info!("Exported {} records to {}", records.len(), path.display());
    Ok(())
}

/// Reads an export file, inferring the format from its extension
pub fn read_export(path: &Path) -> OutputResult<Vec<ItemRecord>> {
    let format = ExportFormat::from_path(path)?;
    let mut reader = BufReader::new(File::open(path)?);
    format.exporter().read_records(&mut reader)
}

/// Writes one export file per configured format
///
/// # Returns
///
/// The paths written, in configuration order
pub fn export_records(
    records: &[ItemRecord],
    config: &OutputConfig,
    now: DateTime<Local>,
) -> OutputResult<Vec<PathBuf>> {
    let timestamp = config.timestamped.then_some(now);
    let directory = Path::new(&config.directory);

    let mut written = Vec::with_capacity(config.formats.len());
    for format in &config.formats {
        let path = export_path(directory, &config.file_stem, *format, timestamp);
        write_export(records, *format, &path)?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Vec<ItemRecord> {
        (1..=4)
            .map(|i| {
                ItemRecord::new(
                    &format!("Laptop {}", i),
                    Some(100.0 * i as f64 + 0.99),
                    Some(f64::from(i)),
                    Some(format!("Model {}, 15.6\"", i)),
                    Some(format!("https://example.com/img/{}.png", i)),
                    Some(i * 3),
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_export_path() {
        let ts = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            export_path(Path::new("out"), "laptops", ExportFormat::Csv, Some(ts)),
            PathBuf::from("out/laptops_20240309_140507.csv")
        );
        assert_eq!(
            export_path(Path::new("out"), "laptops", ExportFormat::Json, None),
            PathBuf::from("out/laptops.json")
        );
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ExportFormat::from_path(Path::new("a/b.CSV")).unwrap(),
            ExportFormat::Csv
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("b.json")).unwrap(),
            ExportFormat::Json
        );
        assert!(matches!(
            ExportFormat::from_path(Path::new("b.xlsx")),
            Err(OutputError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_file_round_trip_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let records = sample();

        for format in [ExportFormat::Csv, ExportFormat::Json] {
            let path = export_path(&dir.path().join("nested"), "products", format, None);
            write_export(&records, format, &path).unwrap();

            let read = read_export(&path).unwrap();
            assert_eq!(read.len(), records.len());
            assert_eq!(read, records);
        }
    }

    #[test]
    fn test_export_records_writes_each_format() {
        let dir = tempfile::tempdir().unwrap();
        let config = OutputConfig {
            directory: dir.path().to_string_lossy().into_owned(),
            file_stem: "laptops".to_string(),
            formats: vec![ExportFormat::Json, ExportFormat::Csv],
            timestamped: true,
            report_path: None,
        };
        let now = Local.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();

        let written = export_records(&sample(), &config, now).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written[0].ends_with("laptops_20250102_030405.json"));
        assert!(written[1].ends_with("laptops_20250102_030405.csv"));
        assert!(written.iter().all(|p| p.exists()));
    }
}
