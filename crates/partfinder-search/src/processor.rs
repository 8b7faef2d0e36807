//! Normalization from raw provider results to [`partfinder_core::Product`].
//!
//! Results are kept only when their link points at an allow-listed US
//! retailer. Price extraction is delegated to [`crate::price`]; this module
//! handles filtering, sanitizing, and provenance tagging.

use partfinder_core::{AppConfig, MissingPricePolicy, Product, Registry};

use crate::price::{extract_price, format_price, placeholder_price, PriceBounds};
use crate::tier::{SearchTier, TierKind};
use crate::types::RawSearchResult;

const UNTITLED: &str = "Untitled listing";

/// Knobs for [`process_results`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessorSettings {
    pub bounds: PriceBounds,
    pub title_max_chars: usize,
    pub missing_price_policy: MissingPricePolicy,
}

impl Default for ProcessorSettings {
    fn default() -> Self {
        Self {
            bounds: PriceBounds::default(),
            title_max_chars: 150,
            missing_price_policy: MissingPricePolicy::Drop,
        }
    }
}

impl ProcessorSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            bounds: PriceBounds::from_config(config),
            title_max_chars: config.title_max_chars,
            missing_price_policy: config.missing_price_policy,
        }
    }
}

/// Filters and normalizes one tier's raw results.
///
/// Each kept result becomes a [`Product`] tagged with the tier's provenance.
/// Results are dropped when the link is missing, unparseable, or not on an
/// allow-listed domain, and (under [`MissingPricePolicy::Drop`]) when no price
/// can be extracted.
#[must_use]
pub fn process_results(
    raw_results: Vec<RawSearchResult>,
    tier: &SearchTier,
    registry: &Registry,
    settings: &ProcessorSettings,
) -> Vec<Product> {
    let allowed: Vec<&str> = registry
        .store_domains()
        .chain(tier.extra_allowed_sites().iter().map(String::as_str))
        .collect();

    raw_results
        .into_iter()
        .filter_map(|raw| process_one(raw, tier, registry, settings, &allowed))
        .collect()
}

fn process_one(
    raw: RawSearchResult,
    tier: &SearchTier,
    registry: &Registry,
    settings: &ProcessorSettings,
    allowed: &[&str],
) -> Option<Product> {
    let Some(link) = raw.link.as_deref() else {
        tracing::debug!(tier = %tier.kind, "dropping result without link");
        return None;
    };

    let Some(source) = allowed_source(link, allowed) else {
        tracing::debug!(tier = %tier.kind, link, "dropping result from non-allow-listed host");
        return None;
    };

    let raw_title = raw
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(UNTITLED);

    let price_text = raw.price_text();
    let mut price_numeric = extract_price(price_text.as_deref(), settings.bounds);
    let mut price_estimated = false;

    let price = if price_numeric > 0.0 {
        price_text.unwrap_or_else(|| format_price(price_numeric))
    } else {
        match settings.missing_price_policy {
            MissingPricePolicy::Drop => {
                tracing::debug!(tier = %tier.kind, link, "dropping result without usable price");
                return None;
            }
            MissingPricePolicy::Placeholder => {
                price_numeric = placeholder_price(raw_title, registry);
                price_estimated = true;
                format!("~{} (est.)", format_price(price_numeric))
            }
        }
    };

    Some(Product {
        title: sanitize_title(raw_title, settings.title_max_chars),
        price,
        price_numeric,
        source,
        link: link.to_owned(),
        is_oem: tier.kind == TierKind::Oem,
        compatibility_note: match tier.kind {
            TierKind::Compatible => tier.note.clone(),
            TierKind::Oem | TierKind::Aftermarket => None,
        },
        rating: raw.rating(),
        reviews: raw.reviews(),
        price_estimated,
    })
}

/// Returns the link's hostname, minus a leading `www.`, if it equals or is a
/// subdomain of an allowed domain.
fn allowed_source(link: &str, allowed: &[&str]) -> Option<String> {
    let url = reqwest::Url::parse(link).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let host = url.host_str()?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    let permitted = allowed.iter().any(|domain| {
        host == *domain
            || host
                .strip_suffix(domain)
                .is_some_and(|prefix| prefix.ends_with('.'))
    });

    permitted.then(|| host.to_owned())
}

/// Truncates to `max_chars` characters (appending `…` when cut) and escapes
/// HTML-significant characters.
fn sanitize_title(title: &str, max_chars: usize) -> String {
    let capped = if title.chars().count() > max_chars {
        let mut cut: String = title.chars().take(max_chars).collect();
        cut.push('…');
        cut
    } else {
        title.to_owned()
    };
    escape_html(&capped)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "processor_test.rs"]
mod tests;
