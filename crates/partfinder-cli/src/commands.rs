//! Command handlers for the CLI.
//!
//! Each handler prints JSON to stdout; logs go to stderr.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use partfinder_core::{AppConfig, Registry};
use partfinder_search::{
    is_valid_auto_part_query, resolve_brand, GeminiQueryExtractor, HttpSettings, PartFinder,
    QueryExtractor, SearchOutcome, SearchSettings, SerpApiClient,
};
use serde::Serialize;

/// Exit code for a query the relevance check rejects.
const EXIT_REJECTED: u8 = 2;

/// Loads the registry from the configured path, or the bundled copy when the
/// file does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read, parsed, or
/// validated.
pub(crate) fn load_registry(config: &AppConfig) -> anyhow::Result<Arc<Registry>> {
    let path = &config.registry_path;
    let registry = if path.exists() {
        partfinder_core::load_registry(path)
            .with_context(|| format!("loading registry from {}", path.display()))?
    } else {
        tracing::info!(
            path = %path.display(),
            "registry file not found, using bundled registry"
        );
        Registry::bundled().context("parsing bundled registry")?
    };
    Ok(Arc::new(registry))
}

/// Runs a search and prints the outcome.
///
/// # Errors
///
/// Returns an error if the image cannot be read, image search is requested
/// without `GEMINI_API_KEY`, or an HTTP client cannot be built. Provider
/// failures are not errors; they show up as missing results.
pub(crate) async fn run_search(
    config: &AppConfig,
    registry: Arc<Registry>,
    query: Option<&str>,
    brand: Option<&str>,
    image: Option<&Path>,
) -> anyhow::Result<ExitCode> {
    let http = HttpSettings::from_config(config);
    let provider = SerpApiClient::new(config.serpapi_key.as_deref(), &http)?;
    let finder = PartFinder::new(registry, provider, SearchSettings::from_config(config));

    let outcome = match image {
        Some(path) => {
            let api_key = config
                .gemini_api_key
                .as_deref()
                .context("image search requires GEMINI_API_KEY")?;
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("reading image {}", path.display()))?;
            let extractor = GeminiQueryExtractor::new(api_key, &config.gemini_model, &http)?;
            let finder = finder.with_extractor(extractor);
            search_with_image(&finder, &bytes, query, brand).await
        }
        None => {
            let query = query.context("a query is required unless --image is given")?;
            finder.find_parts(query, brand).await
        }
    };

    print_outcome(&outcome)?;
    Ok(ExitCode::from(exit_status(&outcome)))
}

async fn search_with_image<V: QueryExtractor>(
    finder: &PartFinder<SerpApiClient, V>,
    image: &[u8],
    query: Option<&str>,
    brand: Option<&str>,
) -> SearchOutcome {
    finder.find_parts_from_image(image, query, brand).await
}

#[derive(Serialize)]
struct PrintedOutcome<'a> {
    #[serde(flatten)]
    outcome: &'a SearchOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

fn print_outcome(outcome: &SearchOutcome) -> anyhow::Result<()> {
    let printed = PrintedOutcome {
        outcome,
        message: outcome.user_message(),
    };
    println!("{}", serde_json::to_string_pretty(&printed)?);
    Ok(())
}

pub(crate) fn exit_status(outcome: &SearchOutcome) -> u8 {
    if outcome.is_rejected() {
        EXIT_REJECTED
    } else {
        0
    }
}

#[derive(Serialize)]
struct BrandSummary<'a> {
    brand: &'a str,
    oem_sites: &'a [String],
    compatible_brands: &'a [String],
}

/// Prints every registry brand as JSON.
///
/// # Errors
///
/// Returns an error only if serialization fails.
pub(crate) fn run_brands(registry: &Registry) -> anyhow::Result<ExitCode> {
    let brands: Vec<BrandSummary<'_>> = registry
        .brands()
        .map(|(brand, entry)| BrandSummary {
            brand,
            oem_sites: &entry.oem_sites,
            compatible_brands: &entry.compatible_brands,
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&brands)?);
    Ok(ExitCode::SUCCESS)
}

#[derive(Debug, Serialize)]
pub(crate) struct Validation {
    pub(crate) query: String,
    pub(crate) valid: bool,
    pub(crate) brand: Option<String>,
    pub(crate) model: Option<String>,
}

pub(crate) fn validate(registry: &Registry, query: &str, brand: Option<&str>) -> Validation {
    let valid = is_valid_auto_part_query(query, registry);
    let resolved = if valid {
        resolve_brand(query, brand, registry)
    } else {
        partfinder_search::ResolvedBrand::default()
    };
    Validation {
        query: query.to_owned(),
        valid,
        brand: resolved.brand,
        model: resolved.model,
    }
}

/// Prints the relevance decision and resolved brand/model for `query`.
///
/// # Errors
///
/// Returns an error only if serialization fails.
pub(crate) fn run_validate(
    registry: &Registry,
    query: &str,
    brand: Option<&str>,
) -> anyhow::Result<ExitCode> {
    let validation = validate(registry, query, brand);
    println!("{}", serde_json::to_string_pretty(&validation)?);
    Ok(if validation.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_REJECTED)
    })
}
