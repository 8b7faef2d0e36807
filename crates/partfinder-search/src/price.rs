//! Price parsing for search-result snippets, plus the estimate used when a
//! listing carries no price at all.

use std::sync::LazyLock;

use partfinder_core::{AppConfig, Registry};
use regex::Regex;

use crate::text::contains_word;

/// Optional `$`, 1–4 integer digits, comma-separated thousands groups, and an
/// optional 1–2 digit fraction: `"$1,234.56"`, `"89.99"`, `"$12"`.
static PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$?([0-9]{1,4}(?:,[0-9]{3})*(?:\.[0-9]{1,2})?)").expect("valid price regex")
});

/// Inclusive range of prices accepted as real. Anything outside parses to `0.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for PriceBounds {
    fn default() -> Self {
        Self {
            min: 0.01,
            max: 50_000.0,
        }
    }
}

impl PriceBounds {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            min: config.price_min,
            max: config.price_max,
        }
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Extracts the first price-shaped number from `text`.
///
/// Returns `0.0` for absent or empty text, text without a price, and prices
/// outside `bounds`.
#[must_use]
pub fn extract_price(text: Option<&str>, bounds: PriceBounds) -> f64 {
    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        return 0.0;
    };

    let Some(captures) = PRICE.captures(text) else {
        return 0.0;
    };

    let digits = captures[1].replace(',', "");
    match digits.parse::<f64>() {
        Ok(value) if bounds.contains(value) => value,
        Ok(value) => {
            tracing::debug!(text, value, "price outside accepted bounds");
            0.0
        }
        Err(_) => 0.0,
    }
}

/// Estimated price for a listing with no discoverable price.
///
/// Uses the first registry placeholder category whose token appears as a
/// whole word in the title, falling back to the registry default.
#[must_use]
pub fn placeholder_price(title: &str, registry: &Registry) -> f64 {
    let lower = title.to_lowercase();
    registry
        .placeholder_categories()
        .iter()
        .find(|c| contains_word(&lower, &c.token))
        .map_or_else(|| registry.default_placeholder_price(), |c| c.price)
}

/// Formats a numeric price for display with thousands separators, e.g.
/// `42.5` → `"$42.50"`, `12345.0` → `"$12,345.00"`.
///
/// The output always parses back to the same value through [`extract_price`].
#[must_use]
pub fn format_price(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i).is_multiple_of(3) {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

#[cfg(test)]
#[path = "price_test.rs"]
mod tests;
