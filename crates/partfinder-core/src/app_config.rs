use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// What to do with a listing whose price cannot be discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPricePolicy {
    /// Drop the listing; only price-bearing results are actionable.
    #[default]
    Drop,
    /// Keep the listing with a category-based estimated price.
    Placeholder,
}

/// What to do when neither the query nor the override names a known brand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnresolvedBrandPolicy {
    /// Run an aftermarket-only search with no brand filtering.
    #[default]
    Generic,
    /// Stop and report the brand as unresolved.
    Reject,
}

/// What to do when the compatible tiers still leave the result set below the floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompatibleFallback {
    /// Give up and rank what was gathered.
    #[default]
    None,
    /// Issue one broad (non-exact-phrase) aftermarket query.
    Widen,
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub registry_path: PathBuf,
    pub serpapi_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub inter_request_delay_ms: u64,
    pub search_budget_secs: u64,
    pub provider_max_retries: u32,
    pub provider_backoff_base_secs: u64,
    pub result_cap: usize,
    pub compatible_floor: usize,
    pub cache_ttl_secs: u64,
    pub cache_capacity: usize,
    pub price_min: f64,
    pub price_max: f64,
    pub title_max_chars: usize,
    pub missing_price_policy: MissingPricePolicy,
    pub unresolved_brand_policy: UnresolvedBrandPolicy,
    pub compatible_fallback: CompatibleFallback,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("registry_path", &self.registry_path)
            .field(
                "serpapi_key",
                &self.serpapi_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("gemini_model", &self.gemini_model)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .field("search_budget_secs", &self.search_budget_secs)
            .field("provider_max_retries", &self.provider_max_retries)
            .field(
                "provider_backoff_base_secs",
                &self.provider_backoff_base_secs,
            )
            .field("result_cap", &self.result_cap)
            .field("compatible_floor", &self.compatible_floor)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("cache_capacity", &self.cache_capacity)
            .field("price_min", &self.price_min)
            .field("price_max", &self.price_max)
            .field("title_max_chars", &self.title_max_chars)
            .field("missing_price_policy", &self.missing_price_policy)
            .field("unresolved_brand_policy", &self.unresolved_brand_policy)
            .field("compatible_fallback", &self.compatible_fallback)
            .finish()
    }
}
