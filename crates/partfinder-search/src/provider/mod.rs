//! Pluggable web-search backends.

mod serpapi;

use std::future::Future;

pub use serpapi::SerpApiClient;

use crate::error::SearchError;
use crate::types::RawSearchResult;

/// Engine and locale parameters for one provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub engine: String,
    pub location: String,
    /// Two-letter country code (`gl`).
    pub country: String,
    /// Two-letter interface language (`hl`).
    pub language: String,
    pub result_count: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            engine: "google".to_owned(),
            location: "United States".to_owned(),
            country: "us".to_owned(),
            language: "en".to_owned(),
            result_count: 10,
        }
    }
}

/// A web-search backend returning raw organic results.
///
/// Implementations must be `Send + Sync` so a `PartFinder` can be shared
/// across tasks.
pub trait SearchProvider: Send + Sync {
    /// Whether the backend has the credentials it needs to make calls.
    ///
    /// The pipeline serves an example listing instead of searching when this
    /// is `false`.
    fn is_configured(&self) -> bool {
        true
    }

    /// Runs one search.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] on network failure, non-2xx status, an
    /// API-level error payload, or an unparseable body.
    fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> impl Future<Output = Result<Vec<RawSearchResult>, SearchError>> + Send;
}
