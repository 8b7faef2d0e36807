//! Shared types for the auto parts finder: configuration, the static
//! brand/store/keyword registry, and the `Product` output entity.

pub mod app_config;
pub mod config;
pub mod products;
pub mod registry;

use thiserror::Error;

pub use app_config::{
    AppConfig, CompatibleFallback, Environment, MissingPricePolicy, UnresolvedBrandPolicy,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::Product;
pub use registry::{
    load_registry, parse_registry, BrandEntry, PlaceholderPrice, PlaceholderPrices, Registry,
    RegistryFile, StoreEntry, StoreKind,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read registry file {path}: {source}")]
    RegistryFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse registry file: {0}")]
    RegistryFileParse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),
}
