//! Static lookup data: part keywords, allow-listed US retailers, and vehicle
//! brands with their OEM sites and compatible brands.
//!
//! The registry is loaded once at startup from YAML, validated, and then only
//! ever read. Brands live in a `BTreeMap`, so every scan over them runs in
//! alphabetical order.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const BUNDLED_REGISTRY: &str = include_str!("../../../config/registry.yaml");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// Dealer-operated OEM parts store.
    Oem,
    /// Brick-and-mortar aftermarket chain.
    Aftermarket,
    /// Online-only catalog retailer.
    Online,
    /// Marque or region specialist (e.g. European imports).
    Specialized,
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKind::Oem => write!(f, "oem"),
            StoreKind::Aftermarket => write!(f, "aftermarket"),
            StoreKind::Online => write!(f, "online"),
            StoreKind::Specialized => write!(f, "specialized"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreEntry {
    pub domain: String,
    pub kind: Option<StoreKind>,
    /// Lower is preferred. Informational only; ranking never reads it.
    pub priority: Option<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandEntry {
    #[serde(default)]
    pub oem_sites: Vec<String>,
    #[serde(default)]
    pub compatible_brands: Vec<String>,
    /// Model tokens scanned in order; put multi-word models before their
    /// single-word suffixes (`"grand cherokee"` before `"cherokee"`).
    #[serde(default)]
    pub models: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceholderPrice {
    pub token: String,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceholderPrices {
    pub default: f64,
    #[serde(default)]
    pub categories: Vec<PlaceholderPrice>,
}

/// On-disk shape of `config/registry.yaml`.
#[derive(Debug, Deserialize)]
pub struct RegistryFile {
    pub keywords: Vec<String>,
    pub stores: Vec<StoreEntry>,
    pub brands: BTreeMap<String, BrandEntry>,
    pub placeholder_prices: PlaceholderPrices,
}

/// Validated, read-only registry shared by every search.
#[derive(Debug, Clone)]
pub struct Registry {
    keywords: BTreeSet<String>,
    stores: Vec<StoreEntry>,
    brands: BTreeMap<String, BrandEntry>,
    placeholder_prices: PlaceholderPrices,
}

impl Registry {
    /// Parses the registry compiled into the binary from `config/registry.yaml`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the bundled file fails to parse or validate.
    pub fn bundled() -> Result<Self, ConfigError> {
        parse_registry(BUNDLED_REGISTRY)
    }

    /// Part-name tokens, lowercase.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    /// All allow-listed retailers, in file order.
    #[must_use]
    pub fn stores(&self) -> &[StoreEntry] {
        &self.stores
    }

    pub fn store_domains(&self) -> impl Iterator<Item = &str> {
        self.stores.iter().map(|s| s.domain.as_str())
    }

    /// Brand identifiers in alphabetical order.
    pub fn brand_names(&self) -> impl Iterator<Item = &str> {
        self.brands.keys().map(String::as_str)
    }

    /// Brands with their entries, in alphabetical order.
    pub fn brands(&self) -> impl Iterator<Item = (&str, &BrandEntry)> {
        self.brands.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Looks up a brand by identifier, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn brand(&self, name: &str) -> Option<&BrandEntry> {
        self.brands.get(name.trim().to_lowercase().as_str())
    }

    #[must_use]
    pub fn placeholder_categories(&self) -> &[PlaceholderPrice] {
        &self.placeholder_prices.categories
    }

    #[must_use]
    pub fn default_placeholder_price(&self) -> f64 {
        self.placeholder_prices.default
    }
}

/// Load and validate the registry from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_registry(path: &Path) -> Result<Registry, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RegistryFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_registry(&content)
}

/// Parse and validate a registry from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the text does not parse or fails validation.
pub fn parse_registry(content: &str) -> Result<Registry, ConfigError> {
    let file: RegistryFile = serde_yaml::from_str(content)?;
    validate_registry(&file)?;

    let keywords = file
        .keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .collect();

    let stores = file
        .stores
        .into_iter()
        .map(|s| StoreEntry {
            domain: s.domain.trim().to_lowercase(),
            ..s
        })
        .collect();

    Ok(Registry {
        keywords,
        stores,
        brands: file.brands,
        placeholder_prices: file.placeholder_prices,
    })
}

fn validate_registry(file: &RegistryFile) -> Result<(), ConfigError> {
    if file.keywords.iter().all(|k| k.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "keyword set must be non-empty".to_string(),
        ));
    }

    if file.stores.is_empty() {
        return Err(ConfigError::Validation(
            "store registry must list at least one domain".to_string(),
        ));
    }

    let mut seen_domains = HashSet::new();
    for store in &file.stores {
        let domain = store.domain.trim().to_lowercase();
        if domain.is_empty() || domain.contains('/') || domain.contains(' ') {
            return Err(ConfigError::Validation(format!(
                "store domain '{}' must be a bare hostname",
                store.domain
            )));
        }
        if !seen_domains.insert(domain) {
            return Err(ConfigError::Validation(format!(
                "duplicate store domain: '{}'",
                store.domain
            )));
        }
    }

    for (name, brand) in &file.brands {
        if name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "brand identifier must be non-empty".to_string(),
            ));
        }
        if name.trim() != name || name.to_lowercase() != *name {
            return Err(ConfigError::Validation(format!(
                "brand identifier '{name}' must be trimmed lowercase"
            )));
        }
        if brand.compatible_brands.iter().any(|c| c == name) {
            return Err(ConfigError::Validation(format!(
                "brand '{name}' lists itself as a compatible brand"
            )));
        }
        if brand.oem_sites.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "brand '{name}' has an empty OEM site"
            )));
        }
    }

    let prices = &file.placeholder_prices;
    let bad_price = |p: f64| !p.is_finite() || p <= 0.0;
    if bad_price(prices.default) {
        return Err(ConfigError::Validation(format!(
            "default placeholder price {} must be positive",
            prices.default
        )));
    }
    if let Some(bad) = prices.categories.iter().find(|c| bad_price(c.price)) {
        return Err(ConfigError::Validation(format!(
            "placeholder price for '{}' must be positive, got {}",
            bad.token, bad.price
        )));
    }

    Ok(())
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
