//! Catalog analysis over aggregated records
//!
//! Filtering, ordering and rankings applied to a scraped collection before
//! it is exported or summarized.

mod filter;
mod rank;

pub use filter::RecordFilter;
pub use rank::{best_value, most_expensive, sort_records, top_rated, SortKey, SortOrder};
