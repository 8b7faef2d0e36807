//! Tiered auto-parts search over a web-search provider.
//!
//! A query is validated as auto-parts related, resolved to a vehicle brand,
//! searched across OEM, aftermarket, and compatible-brand retailer tiers,
//! then filtered, deduplicated, ranked, and cached.

pub mod cache;
pub mod error;
pub mod http;
pub mod outcome;
pub mod pipeline;
pub mod price;
pub mod processor;
pub mod provider;
pub mod query;
pub(crate) mod rate_limit;
pub mod ranking;
pub mod relevance;
pub mod resolver;
pub(crate) mod text;
pub mod tier;
pub mod types;
pub mod vision;

pub use cache::{cache_key, ResultCache};
pub use error::SearchError;
pub use http::HttpSettings;
pub use outcome::{SearchOutcome, SearchResults};
pub use pipeline::{PartFinder, SearchSettings, SearchStage};
pub use price::{extract_price, placeholder_price, PriceBounds};
pub use processor::{process_results, ProcessorSettings};
pub use provider::{SearchOptions, SearchProvider, SerpApiClient};
pub use query::{build_broad_query, build_site_query, build_tier_query};
pub use ranking::{dedupe_by_link, rank};
pub use relevance::is_valid_auto_part_query;
pub use resolver::{resolve_brand, ResolvedBrand};
pub use tier::{SearchTier, TierKind, TierPlan};
pub use types::RawSearchResult;
pub use vision::{GeminiQueryExtractor, NoVision, QueryExtractor, VisionError};
