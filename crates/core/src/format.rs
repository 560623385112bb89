//! Display formatting for individual place fields.
//!
//! Price tiers, business status labels, rating stars, category labels and
//! grouped counts. Everything here is pure.

use crate::error::{Error, Result};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// Regex matching the first character of each word.
static WORD_START_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w").unwrap());

/// Shown when a place has no price level.
pub const PRICE_NOT_SPECIFIED: &str = "Not specified";

/// Price tier labels, indexed by price level.
const PRICE_TIERS: [&str; 5] = ["Free", "Inexpensive", "Moderate", "Expensive", "Very Expensive"];

/// Repeated once per tier step.
const PRICE_MARKER: char = '$';

/// Known business status values and their labels.
const BUSINESS_STATUS_LABELS: [(&str, &str); 3] = [
    ("OPERATIONAL", "Operational"),
    ("CLOSED_TEMPORARILY", "Temporarily Closed"),
    ("CLOSED_PERMANENTLY", "Permanently Closed"),
];

/// Highest rating on the star scale.
pub const MAX_STARS: u8 = 5;

/// Format a price level as markers plus tier label, e.g. `"$$ (Inexpensive)"`.
///
/// Absent levels give [`PRICE_NOT_SPECIFIED`]. Levels outside 0..=4 are an
/// [`Error::InvalidRange`].
pub fn format_price_level(level: Option<i64>) -> Result<String> {
    let Some(level) = level else {
        return Ok(PRICE_NOT_SPECIFIED.to_string());
    };

    let label = usize::try_from(level)
        .ok()
        .and_then(|idx| PRICE_TIERS.get(idx))
        .ok_or(Error::InvalidRange {
            field: "price_level",
            value: level,
            min: 0,
            max: PRICE_TIERS.len() as i64 - 1,
        })?;

    let markers: String = std::iter::repeat(PRICE_MARKER)
        .take(level as usize + 1)
        .collect();

    Ok(format!("{} ({})", markers, label))
}

/// Map a business status to its label. Unknown statuses pass through unchanged
/// and an absent status stays absent.
pub fn format_business_status(status: Option<&str>) -> Option<String> {
    let status = status?;

    let label = BUSINESS_STATUS_LABELS
        .iter()
        .find(|(key, _)| *key == status)
        .map(|(_, label)| *label)
        .unwrap_or(status);

    Some(label.to_string())
}

/// Filled and empty star counts for a rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatingStars {
    pub filled: u8,
    pub empty: u8,
}

impl fmt::Display for RatingStars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.filled {
            f.write_str("★")?;
        }
        for _ in 0..self.empty {
            f.write_str("☆")?;
        }
        Ok(())
    }
}

/// Convert a rating into stars. The rating is clamped to 0..=5 and floored.
///
/// Returns `None` for an absent rating so callers can omit the row.
pub fn format_rating_stars(rating: Option<f64>) -> Option<RatingStars> {
    let rating = rating?;
    if rating.is_nan() {
        return None;
    }

    let filled = rating.clamp(0.0, MAX_STARS as f64).floor() as u8;

    Some(RatingStars {
        filled,
        empty: MAX_STARS - filled,
    })
}

/// Turn a category slug into a label: `"fine_dining"` becomes `"Fine Dining"`.
pub fn format_category(slug: &str) -> String {
    let spaced = slug.replace('_', " ");
    WORD_START_REGEX
        .replace_all(&spaced, |caps: &regex::Captures| caps[0].to_uppercase())
        .into_owned()
}

/// Group digits in thousands with commas, e.g. `1234567` becomes `"1,234,567"`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}
