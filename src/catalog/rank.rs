use crate::record::ItemRecord;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Field to order records by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Price,
    Rating,
    Reviews,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "price" => Ok(Self::Price),
            "rating" => Ok(Self::Rating),
            "reviews" => Ok(Self::Reviews),
            other => Err(format!(
                "unknown sort key '{}' (expected name, price, rating or reviews)",
                other
            )),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Name => "name",
            Self::Price => "price",
            Self::Rating => "rating",
            Self::Reviews => "reviews",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Sorts records in place
///
/// The sort is stable. Missing values sort first in ascending order and
/// last in descending order; names compare case-insensitively.
pub fn sort_records(records: &mut [ItemRecord], key: SortKey, order: SortOrder) {
    records.sort_by(|a, b| {
        let ordering = compare_by(a, b, key);
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}

fn compare_by(a: &ItemRecord, b: &ItemRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
        SortKey::Price => compare_optional(a.price(), b.price()),
        SortKey::Rating => compare_optional(a.rating(), b.rating()),
        SortKey::Reviews => a.reviews().cmp(&b.reviews()),
    }
}

fn compare_optional(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// The `n` highest-rated records; ties keep collection order
pub fn top_rated(records: &[ItemRecord], n: usize) -> Vec<&ItemRecord> {
    largest_by(records, n, ItemRecord::rating)
}

/// The `n` most expensive records; ties keep collection order
pub fn most_expensive(records: &[ItemRecord], n: usize) -> Vec<&ItemRecord> {
    largest_by(records, n, ItemRecord::price)
}

/// The `n` records with the highest rating per hundred currency units
pub fn best_value(records: &[ItemRecord], n: usize) -> Vec<&ItemRecord> {
    largest_by(records, n, ItemRecord::value_score)
}

fn largest_by<F>(records: &[ItemRecord], n: usize, metric: F) -> Vec<&ItemRecord>
where
    F: Fn(&ItemRecord) -> Option<f64>,
{
    let mut scored: Vec<(f64, &ItemRecord)> = records
        .iter()
        .filter_map(|record| metric(record).map(|value| (value, record)))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().take(n).map(|(_, record)| record).collect()
}
