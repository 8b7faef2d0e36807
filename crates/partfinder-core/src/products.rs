use serde::{Deserialize, Serialize};

/// A purchasable part listing, normalized from one search-provider result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// HTML-escaped, length-capped listing title.
    pub title: String,
    /// Price as shown to the user, e.g. `"$42.99"` or `"~$45.00 (est.)"`.
    pub price: String,
    /// Parsed price used for ranking. `0.0` only when the price is unknown.
    pub price_numeric: f64,
    /// Retailer hostname with any leading `www.` removed, e.g. `"rockauto.com"`.
    pub source: String,
    pub link: String,
    /// `true` only for listings found by the OEM-site tier.
    pub is_oem: bool,
    /// Set on compatible-brand listings, e.g. `"Compatible with FORD (LINCOLN part)"`.
    pub compatibility_note: Option<String>,
    pub rating: Option<f64>,
    pub reviews: Option<u64>,
    /// `true` when `price_numeric` is an estimate rather than a scraped price.
    #[serde(default)]
    pub price_estimated: bool,
}

impl Product {
    /// Returns `true` if this listing came from a substitute brand search.
    #[must_use]
    pub fn is_compatible(&self) -> bool {
        self.compatibility_note.is_some()
    }
}
