//! Search tiers: which sites a provider call is scoped to and how its results
//! are tagged.

use partfinder_core::Registry;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TierKind {
    /// The brand's own dealer parts sites.
    Oem,
    /// General US aftermarket retailers.
    Aftermarket,
    /// Aftermarket retailers, searched under a substitute brand name.
    Compatible,
}

impl std::fmt::Display for TierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TierKind::Oem => write!(f, "oem"),
            TierKind::Aftermarket => write!(f, "aftermarket"),
            TierKind::Compatible => write!(f, "compatible"),
        }
    }
}

/// One tier of the search plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTier {
    pub kind: TierKind,
    /// Domains the query is scoped to with `site:` filters.
    pub sites: Vec<String>,
    /// The brand substituted into the query text (compatible tiers only).
    pub substitute_brand: Option<String>,
    /// Note attached to every product found by this tier.
    pub note: Option<String>,
}

impl SearchTier {
    #[must_use]
    pub fn oem(sites: Vec<String>) -> Self {
        Self {
            kind: TierKind::Oem,
            sites,
            substitute_brand: None,
            note: None,
        }
    }

    #[must_use]
    pub fn aftermarket(sites: Vec<String>) -> Self {
        Self {
            kind: TierKind::Aftermarket,
            sites,
            substitute_brand: None,
            note: None,
        }
    }

    /// A tier searching `sites` for `substitute`'s version of a `brand` part.
    #[must_use]
    pub fn compatible(sites: Vec<String>, brand: &str, substitute: &str) -> Self {
        Self {
            kind: TierKind::Compatible,
            sites,
            substitute_brand: Some(substitute.to_owned()),
            note: Some(format!(
                "Compatible with {} ({} part)",
                brand.to_uppercase(),
                substitute.to_uppercase()
            )),
        }
    }

    /// Domains accepted from this tier beyond the global store registry.
    ///
    /// Only the OEM tier widens the allow-list, with the brand's dealer sites.
    #[must_use]
    pub fn extra_allowed_sites(&self) -> &[String] {
        match self.kind {
            TierKind::Oem => &self.sites,
            TierKind::Aftermarket | TierKind::Compatible => &[],
        }
    }
}

/// The ordered tiers for one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierPlan {
    pub oem: Option<SearchTier>,
    pub aftermarket: SearchTier,
    /// Queried only while the running result count is below the floor.
    pub compatible: Vec<SearchTier>,
}

impl TierPlan {
    /// Builds the plan for `brand`, or the brand-agnostic aftermarket-only
    /// plan when `brand` is `None` or unknown.
    #[must_use]
    pub fn for_brand(brand: Option<&str>, registry: &Registry) -> Self {
        let stores: Vec<String> = registry.store_domains().map(str::to_owned).collect();
        let aftermarket = SearchTier::aftermarket(stores.clone());

        let Some((name, entry)) = brand.and_then(|b| registry.brand(b).map(|e| (b, e))) else {
            return Self {
                oem: None,
                aftermarket,
                compatible: Vec::new(),
            };
        };

        let oem =
            (!entry.oem_sites.is_empty()).then(|| SearchTier::oem(entry.oem_sites.clone()));
        let compatible = entry
            .compatible_brands
            .iter()
            .map(|substitute| SearchTier::compatible(stores.clone(), name, substitute))
            .collect();

        Self {
            oem,
            aftermarket,
            compatible,
        }
    }
}
