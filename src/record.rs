//! Item record definitions
//!
//! An [`ItemRecord`] is one product listing extracted from a catalog page.
//! Records are validated on construction and immutable afterwards.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound of the rating scale
pub const MAX_RATING: f64 = 5.0;

/// Reasons a candidate record is rejected
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("Record has no name")]
    MissingName,

    #[error("Unparseable price: '{0}'")]
    InvalidPrice(String),

    #[error("Negative price: {0}")]
    NegativePrice(f64),
}

/// One scraped product listing
///
/// Field order is the export column order. Deserialized records go through
/// the same validation as [`ItemRecord::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RecordFields")]
pub struct ItemRecord {
    name: String,
    price: Option<f64>,
    rating: Option<f64>,
    description: Option<String>,
    image: Option<String>,
    reviews: Option<u32>,
}

impl ItemRecord {
    /// Creates a validated record
    ///
    /// The name must be non-empty after trimming and the price, if present,
    /// must be finite and non-negative. Ratings outside `0..=5` are dropped
    /// rather than rejecting the record.
    pub fn new(
        name: &str,
        price: Option<f64>,
        rating: Option<f64>,
        description: Option<String>,
        image: Option<String>,
        reviews: Option<u32>,
    ) -> Result<Self, RecordError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RecordError::MissingName);
        }

        let price = match price {
            Some(p) if !p.is_finite() => return Err(RecordError::InvalidPrice(p.to_string())),
            Some(p) if p < 0.0 => return Err(RecordError::NegativePrice(p)),
            // Collapses -0.0 so equal prices share one dedup key
            Some(p) if p == 0.0 => Some(0.0),
            other => other,
        };

        let rating = rating.filter(|r| r.is_finite() && (0.0..=MAX_RATING).contains(r));

        Ok(Self {
            name: name.to_string(),
            price,
            rating,
            description: non_empty(description),
            image: non_empty(image),
            reviews,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Option<f64> {
        self.price
    }

    pub fn rating(&self) -> Option<f64> {
        self.rating
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn reviews(&self) -> Option<u32> {
        self.reviews
    }

    /// Natural key used for de-duplication: (name, price)
    pub fn dedup_key(&self) -> (String, Option<u64>) {
        (self.name.clone(), self.price.map(f64::to_bits))
    }

    /// Rating per hundred currency units, used to rank "best value" listings
    ///
    /// Returns None when the record has no rating or no positive price.
    pub fn value_score(&self) -> Option<f64> {
        match (self.rating, self.price) {
            (Some(rating), Some(price)) if price > 0.0 => Some(rating / (price / 100.0)),
            _ => None,
        }
    }
}

/// Unvalidated field set read from an export file
#[derive(Deserialize)]
struct RecordFields {
    name: String,
    price: Option<f64>,
    rating: Option<f64>,
    description: Option<String>,
    image: Option<String>,
    reviews: Option<u32>,
}

impl TryFrom<RecordFields> for ItemRecord {
    type Error = RecordError;

    fn try_from(fields: RecordFields) -> Result<Self, Self::Error> {
        ItemRecord::new(
            &fields.name,
            fields.price,
            fields.rating,
            fields.description,
            fields.image,
            fields.reviews,
        )
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses a displayed price such as `"$1,299.99"` or `"Rs. 1,299"`
///
/// Text before the first digit is treated as a currency label; a `-` at
/// either end of that label (`"-$3"`, `"$-3"`) makes the value negative.
/// The number itself must be one run of digits with an optional `.` decimal
/// part and `,` separators between groups of three digits. Any other digits left
/// in the text, or separators in other positions (such as `"1.299,00"`),
/// make the price unparseable. Returns `Ok(None)` for blank text.
pub fn parse_price(text: &str) -> Result<Option<f64>, RecordError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let invalid = || RecordError::InvalidPrice(trimmed.to_string());

    let start = trimmed
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(invalid)?;
    let label = trimmed[..start].trim_end();
    let negative = label.starts_with('-') || label.ends_with('-');

    let rest = &trimmed[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
        .unwrap_or(rest.len());
    let (token, suffix) = rest.split_at(end);
    if suffix.contains(|c: char| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let number = strip_group_separators(token).ok_or_else(invalid)?;
    let value: f64 = number.parse().map_err(|_| invalid())?;
    Ok(Some(if negative { -value } else { value }))
}

/// Removes thousands separators from a numeric token
///
/// Returns None unless every `,` separates groups of three digits in the
/// integer part and there is at most one `.`.
fn strip_group_separators(token: &str) -> Option<String> {
    // Trailing punctuation belongs to the surrounding sentence
    let token = token.trim_end_matches(|c: char| c == '.' || c == ',');

    let (integer, fraction) = match token.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (token, None),
    };

    let mut groups = integer.split(',');
    let first = groups.next().filter(|g| !g.is_empty())?;
    let mut digits = first.to_string();
    let mut grouped = false;
    for group in groups {
        if group.len() != 3 {
            return None;
        }
        digits.push_str(group);
        grouped = true;
    }
    if grouped && first.len() > 3 {
        return None;
    }

    if let Some(fraction) = fraction {
        if fraction.is_empty() || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        digits.push('.');
        digits.push_str(fraction);
    }

    Some(digits)
}

/// Parses a rating value such as `"4"` or `"4.5"`
///
/// Unparseable text yields None.
pub fn parse_rating(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

/// Parses the leading integer of a review count such as `"14 reviews"`
pub fn parse_review_count(text: &str) -> Option<u32> {
    text.split_whitespace()
        .next()
        .and_then(|token| token.replace(',', "").parse::<u32>().ok())
}
