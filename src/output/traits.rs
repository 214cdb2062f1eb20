//! Output traits and error types
//!
//! This module defines the interface shared by the export formats and the
//! errors raised while writing or reading export files.

use crate::record::ItemRecord;
use std::io::{Read, Write};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown export format: {0}")]
    UnknownFormat(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A file format records can be exported to and read back from
///
/// Every format writes one entry per record with the fields in the order
/// name, price, rating, description, image, reviews.
pub trait RecordExporter {
    /// Writes all records to the writer
    fn write_records(&self, records: &[ItemRecord], writer: &mut dyn Write) -> OutputResult<()>;

    /// Reads records previously written by [`RecordExporter::write_records`]
    ///
    /// Every record passes the same validation as freshly scraped ones.
    fn read_records(&self, reader: &mut dyn Read) -> OutputResult<Vec<ItemRecord>>;
}
