//! Brand and model extraction from query text.

use partfinder_core::Registry;
use serde::Serialize;

use crate::text::contains_word;

/// The vehicle brand (and model, when recognizable) a query targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedBrand {
    pub brand: Option<String>,
    pub model: Option<String>,
}

impl ResolvedBrand {
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.brand.is_some()
    }
}

/// Resolves the target brand for `query`.
///
/// A `brand_override` naming a registry brand wins unconditionally; an
/// unknown override is ignored. Otherwise the first registry brand, in
/// alphabetical order, that appears as a whole word in the query is chosen.
/// The model is the first of that brand's model tokens found in the query.
#[must_use]
pub fn resolve_brand(
    query: &str,
    brand_override: Option<&str>,
    registry: &Registry,
) -> ResolvedBrand {
    let lower = query.to_lowercase();

    let overridden = brand_override
        .map(|b| b.trim().to_lowercase())
        .filter(|b| !b.is_empty())
        .and_then(|b| {
            if registry.brand(&b).is_some() {
                Some(b)
            } else {
                tracing::warn!(brand = %b, "ignoring unknown brand override");
                None
            }
        });

    let brand = overridden.or_else(|| {
        registry
            .brand_names()
            .find(|name| contains_word(&lower, name))
            .map(str::to_owned)
    });

    let model = brand.as_deref().and_then(|name| {
        registry
            .brand(name)?
            .models
            .iter()
            .find(|m| contains_word(&lower, &m.to_lowercase()))
            .cloned()
    });

    tracing::debug!(query, brand = ?brand, model = ?model, "resolved brand");
    ResolvedBrand { brand, model }
}
