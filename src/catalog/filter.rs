use crate::record::ItemRecord;
use std::collections::BTreeSet;

/// Selects records by price range and rating
///
/// Unset criteria match every record. A record without a price never matches
/// a price bound, and a record without a rating never matches a rating set.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Allowed ratings, compared against the rating rounded to the nearest star
    pub ratings: BTreeSet<u8>,
}

impl RecordFilter {
    /// Returns true if no criteria are set
    pub fn is_empty(&self) -> bool {
        self.min_price.is_none() && self.max_price.is_none() && self.ratings.is_empty()
    }

    /// Returns true if the record satisfies every criterion
    pub fn matches(&self, record: &ItemRecord) -> bool {
        if self.min_price.is_some() || self.max_price.is_some() {
            let Some(price) = record.price() else {
                return false;
            };
            if self.min_price.is_some_and(|min| price < min) {
                return false;
            }
            if self.max_price.is_some_and(|max| price > max) {
                return false;
            }
        }

        if !self.ratings.is_empty() {
            let Some(rating) = record.rating() else {
                return false;
            };
            if !self.ratings.contains(&(rating.round() as u8)) {
                return false;
            }
        }

        true
    }

    /// Keeps the matching records, preserving order
    pub fn apply(&self, records: Vec<ItemRecord>) -> Vec<ItemRecord> {
        if self.is_empty() {
            return records;
        }
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}
