//! Merging, deduplication, and ordering of per-tier results.

use std::collections::HashSet;

use partfinder_core::Product;

/// Drops every product whose link was already seen, keeping the first.
#[must_use]
pub fn dedupe_by_link(products: Vec<Product>) -> Vec<Product> {
    let mut seen = HashSet::with_capacity(products.len());
    products
        .into_iter()
        .filter(|p| seen.insert(p.link.clone()))
        .collect()
}

/// Merges tier result lists in tier order, dedupes by link, and orders the
/// result OEM-first then by ascending price.
///
/// The sort is stable, so equal-priced products keep their tier order. The
/// output holds at most `cap` products.
#[must_use]
pub fn rank(tier_results: Vec<Vec<Product>>, cap: usize) -> Vec<Product> {
    let merged: Vec<Product> = tier_results.into_iter().flatten().collect();
    let mut ranked = dedupe_by_link(merged);
    ranked.sort_by(|a, b| {
        (!a.is_oem)
            .cmp(&!b.is_oem)
            .then_with(|| a.price_numeric.total_cmp(&b.price_numeric))
    });
    ranked.truncate(cap);
    ranked
}

/// Number of distinct links across `tier_results`.
#[must_use]
pub fn unique_count(tier_results: &[Vec<Product>]) -> usize {
    tier_results
        .iter()
        .flatten()
        .map(|p| p.link.as_str())
        .collect::<HashSet<_>>()
        .len()
}
