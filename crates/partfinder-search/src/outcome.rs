//! Caller-facing search results.

use partfinder_core::Product;
use serde::Serialize;

const REJECTED_MESSAGE: &str = "This site is exclusively for auto parts. \
Please describe a vehicle part, for example \"brake pads 2018 ford f-150\".";

const UNRESOLVED_BRAND_MESSAGE: &str = "We could not tell which vehicle brand \
this part is for. Please include the brand (for example Ford or Toyota) or \
choose one from the list.";

const NO_RESULTS_MESSAGE: &str = "No results found. Try a broader part \
description or a different brand.";

/// A completed search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    /// At most the configured cap, OEM listings first, each group by price.
    pub products: Vec<Product>,
    pub brand: Option<String>,
    pub model: Option<String>,
    /// Served from the result cache without calling the provider.
    pub from_cache: bool,
    /// A placeholder listing returned because no provider is configured.
    pub example: bool,
}

/// Result of [`crate::PartFinder::find_parts`].
///
/// `Rejected` means the query is not about auto parts, which is distinct from
/// a valid query with no matches (`Found` with an empty list).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    Found(SearchResults),
    Rejected,
    /// No brand could be determined and the policy forbids a generic search.
    UnresolvedBrand,
}

impl SearchOutcome {
    /// The message to show the user, if the outcome needs one.
    ///
    /// `None` for a non-empty result list.
    #[must_use]
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            SearchOutcome::Rejected => Some(REJECTED_MESSAGE),
            SearchOutcome::UnresolvedBrand => Some(UNRESOLVED_BRAND_MESSAGE),
            SearchOutcome::Found(results) if results.products.is_empty() => {
                Some(NO_RESULTS_MESSAGE)
            }
            SearchOutcome::Found(_) => None,
        }
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        match self {
            SearchOutcome::Found(results) => &results.products,
            SearchOutcome::Rejected | SearchOutcome::UnresolvedBrand => &[],
        }
    }

    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, SearchOutcome::Rejected)
    }
}
