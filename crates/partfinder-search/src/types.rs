//! Search-provider response types.
//!
//! ## Observed shape of SerpApi Google `organic_results`
//!
//! Each item has `title` and `link`. Shopping-style listings may carry a
//! `rich_snippet.top` block whose `detected_extensions.price` is a bare number
//! (`24.99`) and whose `extensions` array holds display strings such as
//! `"$24.99"` or `"4.6(1.2K)"`. Some items carry a plain top-level `price`
//! instead, either as a number or a string. `rating` and `reviews` appear
//! either at the top level or inside `detected_extensions`.
//!
//! Fields are all optional: the result shape is not under our control, so a
//! malformed item is skipped individually instead of failing the whole page
//! (see [`parse_organic_results`]).

use serde::Deserialize;

use crate::price::format_price;

/// Top-level SerpApi response envelope.
#[derive(Debug, Deserialize)]
pub struct SerpApiResponse {
    #[serde(default)]
    pub organic_results: Vec<serde_json::Value>,
    /// Present when SerpApi rejects the request (bad key, quota, no results).
    pub error: Option<String>,
}

/// A price field that may arrive as a JSON number or string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PriceValue {
    Number(f64),
    Text(String),
}

impl PriceValue {
    /// Text suitable for the price extractor and for display.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            PriceValue::Number(n) => format_price(*n),
            PriceValue::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetectedExtensions {
    pub price: Option<PriceValue>,
    pub rating: Option<f64>,
    pub reviews: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RichSnippetSection {
    pub detected_extensions: Option<DetectedExtensions>,
    #[serde(default)]
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RichSnippet {
    pub top: Option<RichSnippetSection>,
}

/// One provider search hit, before filtering and normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSearchResult {
    pub title: Option<String>,
    pub link: Option<String>,
    pub rich_snippet: Option<RichSnippet>,
    pub price: Option<PriceValue>,
    pub rating: Option<f64>,
    pub reviews: Option<u64>,
}

impl RawSearchResult {
    fn detected(&self) -> Option<&DetectedExtensions> {
        self.rich_snippet
            .as_ref()?
            .top
            .as_ref()?
            .detected_extensions
            .as_ref()
    }

    /// The listing's price text, preferring the rich snippet.
    ///
    /// Order: `rich_snippet.top.detected_extensions.price`, then the first
    /// `$`-bearing `rich_snippet.top.extensions` entry (from the `$` onward,
    /// so a leading rating is skipped), then top-level `price`.
    #[must_use]
    pub fn price_text(&self) -> Option<String> {
        if let Some(price) = self.detected().and_then(|d| d.price.as_ref()) {
            return Some(price.as_text());
        }

        let from_extensions = self
            .rich_snippet
            .as_ref()
            .and_then(|r| r.top.as_ref())
            .and_then(|top| {
                top.extensions
                    .iter()
                    .find_map(|e| e.find('$').map(|at| e[at..].to_owned()))
            });
        if from_extensions.is_some() {
            return from_extensions;
        }

        self.price.as_ref().map(PriceValue::as_text)
    }

    #[must_use]
    pub fn rating(&self) -> Option<f64> {
        self.rating.or_else(|| self.detected().and_then(|d| d.rating))
    }

    #[must_use]
    pub fn reviews(&self) -> Option<u64> {
        self.reviews.or_else(|| self.detected().and_then(|d| d.reviews))
    }
}

/// Parses each organic result independently, skipping items that do not fit
/// [`RawSearchResult`].
#[must_use]
pub fn parse_organic_results(items: Vec<serde_json::Value>) -> Vec<RawSearchResult> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<RawSearchResult>(item) {
            Ok(raw) => Some(raw),
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed organic result");
                None
            }
        })
        .collect()
}
