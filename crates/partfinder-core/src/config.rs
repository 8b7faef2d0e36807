use crate::app_config::{
    AppConfig, CompatibleFallback, Environment, MissingPricePolicy, UnresolvedBrandPolicy,
};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank values count as absent so `SERPAPI_KEY=` in a .env file behaves
    // like an unset key.
    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let value = or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(invalid(var, "must be a finite number".to_string()))
        }
    };

    let env = parse_environment(&or_default("PARTFINDER_ENV", "development"));
    let log_level = or_default("PARTFINDER_LOG_LEVEL", "info");
    let registry_path = PathBuf::from(or_default(
        "PARTFINDER_REGISTRY_PATH",
        "./config/registry.yaml",
    ));

    let serpapi_key = optional("SERPAPI_KEY");
    // Example listings are a development convenience; production must search for real.
    if env == Environment::Production && serpapi_key.is_none() {
        return Err(ConfigError::MissingEnvVar("SERPAPI_KEY".to_string()));
    }
    let gemini_api_key = optional("GEMINI_API_KEY");
    let gemini_model = or_default("PARTFINDER_GEMINI_MODEL", "gemini-1.5-flash");

    let connect_timeout_secs = parse_u64("PARTFINDER_CONNECT_TIMEOUT_SECS", "3")?;
    let request_timeout_secs = parse_u64("PARTFINDER_REQUEST_TIMEOUT_SECS", "10")?;
    let user_agent = or_default(
        "PARTFINDER_USER_AGENT",
        "partfinder/0.1 (auto-parts-search)",
    );
    let inter_request_delay_ms = parse_u64("PARTFINDER_INTER_REQUEST_DELAY_MS", "500")?;
    let search_budget_secs = parse_u64("PARTFINDER_SEARCH_BUDGET_SECS", "15")?;
    let provider_max_retries = parse_u32("PARTFINDER_PROVIDER_MAX_RETRIES", "0")?;
    let provider_backoff_base_secs = parse_u64("PARTFINDER_PROVIDER_BACKOFF_BASE_SECS", "1")?;

    let result_cap = parse_usize("PARTFINDER_RESULT_CAP", "10")?;
    if result_cap == 0 {
        return Err(ConfigError::Validation(
            "PARTFINDER_RESULT_CAP must be at least 1".to_string(),
        ));
    }
    let compatible_floor = parse_usize("PARTFINDER_COMPATIBLE_FLOOR", "5")?;
    let cache_ttl_secs = parse_u64("PARTFINDER_CACHE_TTL_SECS", "300")?;
    let cache_capacity = parse_usize("PARTFINDER_CACHE_CAPACITY", "256")?;

    let price_min = parse_f64("PARTFINDER_PRICE_MIN", "0.01")?;
    let price_max = parse_f64("PARTFINDER_PRICE_MAX", "50000")?;
    if price_min > price_max {
        return Err(ConfigError::Validation(format!(
            "PARTFINDER_PRICE_MIN ({price_min}) exceeds PARTFINDER_PRICE_MAX ({price_max})"
        )));
    }
    let title_max_chars = parse_usize("PARTFINDER_TITLE_MAX_CHARS", "150")?;

    let missing_price_policy = parse_missing_price_policy(&or_default(
        "PARTFINDER_MISSING_PRICE_POLICY",
        "drop",
    ))
    .ok_or_else(|| {
        invalid(
            "PARTFINDER_MISSING_PRICE_POLICY",
            "expected 'drop' or 'placeholder'".to_string(),
        )
    })?;
    let unresolved_brand_policy = parse_unresolved_brand_policy(&or_default(
        "PARTFINDER_UNRESOLVED_BRAND_POLICY",
        "generic",
    ))
    .ok_or_else(|| {
        invalid(
            "PARTFINDER_UNRESOLVED_BRAND_POLICY",
            "expected 'generic' or 'reject'".to_string(),
        )
    })?;
    let compatible_fallback = parse_compatible_fallback(&or_default(
        "PARTFINDER_COMPATIBLE_FALLBACK",
        "none",
    ))
    .ok_or_else(|| {
        invalid(
            "PARTFINDER_COMPATIBLE_FALLBACK",
            "expected 'none' or 'widen'".to_string(),
        )
    })?;

    Ok(AppConfig {
        env,
        log_level,
        registry_path,
        serpapi_key,
        gemini_api_key,
        gemini_model,
        connect_timeout_secs,
        request_timeout_secs,
        user_agent,
        inter_request_delay_ms,
        search_budget_secs,
        provider_max_retries,
        provider_backoff_base_secs,
        result_cap,
        compatible_floor,
        cache_ttl_secs,
        cache_capacity,
        price_min,
        price_max,
        title_max_chars,
        missing_price_policy,
        unresolved_brand_policy,
        compatible_fallback,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_missing_price_policy(s: &str) -> Option<MissingPricePolicy> {
    match s.trim().to_ascii_lowercase().as_str() {
        "drop" => Some(MissingPricePolicy::Drop),
        "placeholder" => Some(MissingPricePolicy::Placeholder),
        _ => None,
    }
}

fn parse_unresolved_brand_policy(s: &str) -> Option<UnresolvedBrandPolicy> {
    match s.trim().to_ascii_lowercase().as_str() {
        "generic" => Some(UnresolvedBrandPolicy::Generic),
        "reject" => Some(UnresolvedBrandPolicy::Reject),
        _ => None,
    }
}

fn parse_compatible_fallback(s: &str) -> Option<CompatibleFallback> {
    match s.trim().to_ascii_lowercase().as_str() {
        "none" => Some(CompatibleFallback::None),
        "widen" => Some(CompatibleFallback::Widen),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
