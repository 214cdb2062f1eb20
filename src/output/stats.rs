//! Statistics over a scraped catalog
//!
//! This module computes the headline metrics of a record collection and
//! prints them to stdout.

use crate::record::ItemRecord;
use std::collections::BTreeMap;

/// Distribution of listing prices
#[derive(Debug, Clone, PartialEq)]
pub struct PriceStatistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; None with fewer than two prices
    pub std_dev: Option<f64>,
}

impl PriceStatistics {
    /// Computes price statistics, or None when there are no prices
    pub fn from_prices(prices: &[f64]) -> Option<Self> {
        if prices.is_empty() {
            return None;
        }

        let mut sorted = prices.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };
        let std_dev = (n > 1).then(|| {
            let variance =
                sorted.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            variance.sqrt()
        });

        Some(Self {
            min: sorted[0],
            max: sorted[n - 1],
            mean,
            median,
            std_dev,
        })
    }
}

/// Catalog statistics summary
#[derive(Debug, Clone)]
pub struct CatalogStatistics {
    /// Number of records
    pub total_products: usize,

    /// Records carrying a price
    pub priced_products: usize,

    /// Mean rating over rated records
    pub average_rating: Option<f64>,

    /// Sum of review counts
    pub total_reviews: u64,

    /// Price distribution over priced records
    pub price: Option<PriceStatistics>,

    /// Number of records per rating, rounded to whole stars
    pub rating_distribution: BTreeMap<u8, usize>,
}

impl CatalogStatistics {
    /// Mean price over priced records
    pub fn average_price(&self) -> Option<f64> {
        self.price.as_ref().map(|p| p.mean)
    }
}

/// Computes statistics for a record collection
pub fn compute_statistics(records: &[ItemRecord]) -> CatalogStatistics {
    let prices: Vec<f64> = records.iter().filter_map(ItemRecord::price).collect();
    let ratings: Vec<f64> = records.iter().filter_map(ItemRecord::rating).collect();

    let average_rating =
        (!ratings.is_empty()).then(|| ratings.iter().sum::<f64>() / ratings.len() as f64);

    let mut rating_distribution = BTreeMap::new();
    for rating in &ratings {
        *rating_distribution.entry(rating.round() as u8).or_insert(0) += 1;
    }

    CatalogStatistics {
        total_products: records.len(),
        priced_products: prices.len(),
        average_rating,
        total_reviews: records
            .iter()
            .filter_map(ItemRecord::reviews)
            .map(u64::from)
            .sum(),
        price: PriceStatistics::from_prices(&prices),
        rating_distribution,
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CatalogStatistics) {
    println!("=== Catalog Statistics ===\n");

    println!("Overview:");
    println!("  Total products: {}", stats.total_products);
    match stats.average_price() {
        Some(avg) => println!("  Average price: ${:.2}", avg),
        None => println!("  Average price: n/a"),
    }
    match stats.average_rating {
        Some(avg) => println!("  Average rating: {:.1} / 5", avg),
        None => println!("  Average rating: n/a"),
    }
    println!("  Total reviews: {}", stats.total_reviews);
    println!();

    if let Some(price) = &stats.price {
        println!("Price Statistics ({} priced):", stats.priced_products);
        println!("  Minimum: ${:.2}", price.min);
        println!("  Maximum: ${:.2}", price.max);
        println!("  Average: ${:.2}", price.mean);
        println!("  Median: ${:.2}", price.median);
        match price.std_dev {
            Some(sd) => println!("  Std Dev: ${:.2}", sd),
            None => println!("  Std Dev: n/a"),
        }
        println!();
    }

    if !stats.rating_distribution.is_empty() {
        println!("Rating Distribution:");
        for (stars, count) in &stats.rating_distribution {
            let percentage = (*count as f64 / stats.total_products as f64) * 100.0;
            println!("  {} stars: {} ({:.1}%)", stars, count, percentage);
        }
    }
}
