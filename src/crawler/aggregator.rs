//! Record aggregation across pages

use crate::record::ItemRecord;
use std::collections::HashSet;

/// Ordered, de-duplicated collection of records
///
/// Records are keyed by (name, price). The first occurrence of a key is kept
/// and later duplicates are dropped.
#[derive(Debug, Default, Clone)]
pub struct Aggregator {
    records: Vec<ItemRecord>,
    seen: HashSet<(String, Option<u64>)>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record unless its key was already seen
    ///
    /// Returns true if the record was added.
    pub fn push(&mut self, record: ItemRecord) -> bool {
        if self.seen.insert(record.dedup_key()) {
            self.records.push(record);
            true
        } else {
            false
        }
    }

    /// Appends records in order, returning how many were added
    pub fn extend<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = ItemRecord>,
    {
        let mut added = 0;
        for record in records {
            if self.push(record) {
                added += 1;
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ItemRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ItemRecord> {
        self.records
    }
}

impl FromIterator<ItemRecord> for Aggregator {
    fn from_iter<I: IntoIterator<Item = ItemRecord>>(iter: I) -> Self {
        let mut aggregator = Self::new();
        aggregator.extend(iter);
        aggregator
    }
}
