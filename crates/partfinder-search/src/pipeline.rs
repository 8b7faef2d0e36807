//! End-to-end part search: validate, resolve, query tiers, rank, cache.

use std::sync::Arc;
use std::time::{Duration, Instant};

use partfinder_core::{AppConfig, CompatibleFallback, Product, Registry, UnresolvedBrandPolicy};

use crate::cache::{cache_key, ResultCache};
use crate::outcome::{SearchOutcome, SearchResults};
use crate::processor::{process_results, ProcessorSettings};
use crate::provider::{SearchOptions, SearchProvider};
use crate::query::{build_broad_query, build_tier_query};
use crate::ranking::{rank, unique_count};
use crate::relevance::is_valid_auto_part_query;
use crate::resolver::{resolve_brand, ResolvedBrand};
use crate::tier::{SearchTier, TierPlan};
use crate::vision::{NoVision, QueryExtractor};

/// Engine knobs, projected from [`AppConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    pub processor: ProcessorSettings,
    pub options: SearchOptions,
    pub result_cap: usize,
    /// Compatible tiers run only while the unique result count is below this.
    pub compatible_floor: usize,
    /// Slept between consecutive provider calls.
    pub inter_request_delay: Duration,
    /// Soft wall-clock budget, checked before every tier after the first.
    pub search_budget: Duration,
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
    pub unresolved_brand_policy: UnresolvedBrandPolicy,
    pub compatible_fallback: CompatibleFallback,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            processor: ProcessorSettings::default(),
            options: SearchOptions::default(),
            result_cap: 10,
            compatible_floor: 5,
            inter_request_delay: Duration::from_millis(500),
            search_budget: Duration::from_secs(15),
            cache_ttl: Duration::from_secs(300),
            cache_capacity: 256,
            unresolved_brand_policy: UnresolvedBrandPolicy::Generic,
            compatible_fallback: CompatibleFallback::None,
        }
    }
}

impl SearchSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            processor: ProcessorSettings::from_config(config),
            options: SearchOptions::default(),
            result_cap: config.result_cap,
            compatible_floor: config.compatible_floor,
            inter_request_delay: Duration::from_millis(config.inter_request_delay_ms),
            search_budget: Duration::from_secs(config.search_budget_secs),
            cache_ttl: Duration::from_secs(config.cache_ttl_secs),
            cache_capacity: config.cache_capacity,
            unresolved_brand_policy: config.unresolved_brand_policy,
            compatible_fallback: config.compatible_fallback,
        }
    }
}

/// Pipeline stages, logged at `debug` as a search moves through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStage {
    Received,
    Validating,
    Rejected,
    BrandResolving,
    TierOem,
    TierAftermarket,
    TierCompatible,
    Ranking,
    Cached,
    Done,
}

impl std::fmt::Display for SearchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SearchStage::Received => "received",
            SearchStage::Validating => "validating",
            SearchStage::Rejected => "rejected",
            SearchStage::BrandResolving => "brand_resolving",
            SearchStage::TierOem => "tier_oem",
            SearchStage::TierAftermarket => "tier_aftermarket",
            SearchStage::TierCompatible => "tier_compatible",
            SearchStage::Ranking => "ranking",
            SearchStage::Cached => "cached",
            SearchStage::Done => "done",
        };
        f.write_str(name)
    }
}

fn enter(stage: SearchStage) {
    tracing::debug!(stage = %stage, "search stage");
}

/// Tracks provider calls and elapsed time for one search.
struct TierRun {
    started: Instant,
    calls: usize,
    results: Vec<Vec<Product>>,
}

impl TierRun {
    fn new() -> Self {
        Self {
            started: Instant::now(),
            calls: 0,
            results: Vec::new(),
        }
    }

    fn unique(&self) -> usize {
        unique_count(&self.results)
    }
}

/// The auto-parts search engine.
///
/// Holds the shared registry, a search provider, an optional image query
/// extractor, and the result cache. `Send + Sync` when its provider and
/// extractor are, so one instance can serve concurrent requests.
pub struct PartFinder<P, V = NoVision> {
    registry: Arc<Registry>,
    provider: P,
    extractor: V,
    cache: ResultCache,
    settings: SearchSettings,
}

impl<P: SearchProvider> PartFinder<P, NoVision> {
    #[must_use]
    pub fn new(registry: Arc<Registry>, provider: P, settings: SearchSettings) -> Self {
        let cache = ResultCache::new(settings.cache_ttl, settings.cache_capacity);
        Self {
            registry,
            provider,
            extractor: NoVision,
            cache,
            settings,
        }
    }
}

impl<P: SearchProvider, V: QueryExtractor> PartFinder<P, V> {
    /// Replaces the image query extractor.
    #[must_use]
    pub fn with_extractor<W: QueryExtractor>(self, extractor: W) -> PartFinder<P, W> {
        PartFinder {
            registry: self.registry,
            provider: self.provider,
            extractor,
            cache: self.cache,
            settings: self.settings,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Searches for parts matching `query`.
    ///
    /// Provider failures never surface here: a failed tier contributes no
    /// results and the search carries on.
    pub async fn find_parts(&self, query: &str, brand_override: Option<&str>) -> SearchOutcome {
        enter(SearchStage::Received);
        let query = query.trim();

        enter(SearchStage::Validating);
        if !is_valid_auto_part_query(query, &self.registry) {
            enter(SearchStage::Rejected);
            return SearchOutcome::Rejected;
        }

        enter(SearchStage::BrandResolving);
        let resolved = resolve_brand(query, brand_override, &self.registry);
        if !resolved.is_resolved()
            && self.settings.unresolved_brand_policy == UnresolvedBrandPolicy::Reject
        {
            tracing::info!(query, "no brand resolved, rejecting per policy");
            enter(SearchStage::Done);
            return SearchOutcome::UnresolvedBrand;
        }

        let key = cache_key(query, resolved.brand.as_deref());
        if let Some(products) = self.cache.get(&key) {
            tracing::debug!(query, count = products.len(), "result cache hit");
            enter(SearchStage::Done);
            return found(products, resolved, true, false);
        }

        if !self.provider.is_configured() {
            tracing::info!(query, "search provider not configured, returning example listing");
            let example = example_listing(resolved.brand.as_deref());
            enter(SearchStage::Done);
            return found(vec![example], resolved, false, true);
        }

        let run = self.run_tiers(query, resolved.brand.as_deref()).await;

        enter(SearchStage::Ranking);
        let products = rank(run.results, self.settings.result_cap);
        tracing::info!(
            query,
            brand = resolved.brand.as_deref().unwrap_or("generic"),
            count = products.len(),
            provider_calls = run.calls,
            "search finished"
        );

        enter(SearchStage::Cached);
        self.cache.put(key, products.clone());

        enter(SearchStage::Done);
        found(products, resolved, false, false)
    }

    /// Searches using text extracted from `image`, joined after any `text`.
    ///
    /// Returns [`SearchOutcome::Rejected`] when neither the text nor the
    /// image yields a usable query.
    pub async fn find_parts_from_image(
        &self,
        image: &[u8],
        text: Option<&str>,
        brand_override: Option<&str>,
    ) -> SearchOutcome {
        let extracted = self.extractor.extract_query_from_image(image).await;
        let combined = [text.map(str::trim), extracted.as_deref().map(str::trim)]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if combined.is_empty() {
            tracing::info!("image search produced no usable query");
            return SearchOutcome::Rejected;
        }
        self.find_parts(&combined, brand_override).await
    }

    async fn run_tiers(&self, query: &str, brand: Option<&str>) -> TierRun {
        let plan = TierPlan::for_brand(brand, &self.registry);
        let mut run = TierRun::new();

        if let Some(oem) = &plan.oem {
            enter(SearchStage::TierOem);
            let text = build_tier_query(oem, query, brand);
            self.run_tier(&mut run, oem, &text).await;
        }

        if self.within_budget(&run) {
            enter(SearchStage::TierAftermarket);
            let text = build_tier_query(&plan.aftermarket, query, brand);
            self.run_tier(&mut run, &plan.aftermarket, &text).await;
        }

        for tier in &plan.compatible {
            if run.unique() >= self.settings.compatible_floor || !self.within_budget(&run) {
                break;
            }
            enter(SearchStage::TierCompatible);
            let text = build_tier_query(tier, query, brand);
            self.run_tier(&mut run, tier, &text).await;
        }

        if self.settings.compatible_fallback == CompatibleFallback::Widen
            && run.unique() < self.settings.compatible_floor
            && self.within_budget(&run)
        {
            tracing::debug!(query, "widening to broad aftermarket query");
            let text = build_broad_query(query, &plan.aftermarket.sites);
            self.run_tier(&mut run, &plan.aftermarket, &text).await;
        }

        run
    }

    /// Always true before the first provider call.
    fn within_budget(&self, run: &TierRun) -> bool {
        if run.calls == 0 {
            return true;
        }
        let within = run.started.elapsed() < self.settings.search_budget;
        if !within {
            tracing::warn!(
                elapsed_ms = run.started.elapsed().as_millis(),
                "search budget exhausted, skipping remaining tiers"
            );
        }
        within
    }

    async fn run_tier(&self, run: &mut TierRun, tier: &SearchTier, text: &str) {
        if run.calls > 0 && !self.settings.inter_request_delay.is_zero() {
            tokio::time::sleep(self.settings.inter_request_delay).await;
        }
        run.calls += 1;

        let products = match self.provider.search(text, &self.settings.options).await {
            Ok(raw) => {
                let fetched = raw.len();
                let products =
                    process_results(raw, tier, &self.registry, &self.settings.processor);
                tracing::debug!(
                    tier = %tier.kind,
                    fetched,
                    kept = products.len(),
                    "tier processed"
                );
                products
            }
            Err(e) => {
                tracing::warn!(tier = %tier.kind, error = %e, "search provider call failed");
                Vec::new()
            }
        };
        run.results.push(products);
    }
}

fn found(
    products: Vec<Product>,
    resolved: ResolvedBrand,
    from_cache: bool,
    example: bool,
) -> SearchOutcome {
    SearchOutcome::Found(SearchResults {
        products,
        brand: resolved.brand,
        model: resolved.model,
        from_cache,
        example,
    })
}

/// Labelled sample listing served when no provider is configured.
fn example_listing(brand: Option<&str>) -> Product {
    let brand = brand.map_or_else(|| "FORD".to_owned(), str::to_uppercase);
    Product {
        title: format!("Example: Oil Filter for {brand}"),
        price: "$15.50".to_owned(),
        price_numeric: 15.50,
        source: "oemparts.com".to_owned(),
        link: "#".to_owned(),
        is_oem: false,
        compatibility_note: None,
        rating: Some(4.5),
        reviews: Some(120),
        price_estimated: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_listing_names_brand() {
        assert_eq!(
            example_listing(Some("toyota")).title,
            "Example: Oil Filter for TOYOTA"
        );
        assert_eq!(example_listing(None).title, "Example: Oil Filter for FORD");
        assert!(!example_listing(None).is_oem);
    }

    #[test]
    fn stage_display_is_snake_case() {
        assert_eq!(SearchStage::TierAftermarket.to_string(), "tier_aftermarket");
        assert_eq!(SearchStage::BrandResolving.to_string(), "brand_resolving");
    }

    #[test]
    fn default_settings_match_documented_defaults() {
        let settings = SearchSettings::default();
        assert_eq!(settings.result_cap, 10);
        assert_eq!(settings.compatible_floor, 5);
        assert_eq!(settings.inter_request_delay, Duration::from_millis(500));
        assert_eq!(settings.cache_capacity, 256);
    }
}
