//! Site-scoped provider query strings.
//!
//! Every tier query pairs an exact-phrase match on the user's text with a
//! disjunction of `site:` filters: `"brake pads" site:a.com OR site:b.com`.

use crate::text::replace_word;
use crate::tier::{SearchTier, TierKind};

/// Builds `"<text>" site:<a> OR site:<b> ...`.
///
/// Double quotes inside `text` are dropped so they cannot close the phrase early.
#[must_use]
pub fn build_site_query(text: &str, sites: &[String]) -> String {
    let phrase = format!("\"{}\"", sanitize_phrase(text));
    append_sites(phrase, sites)
}

/// Like [`build_site_query`] but without the exact-phrase quotes, for the
/// widened fallback search.
#[must_use]
pub fn build_broad_query(text: &str, sites: &[String]) -> String {
    append_sites(sanitize_phrase(text), sites)
}

/// Builds the provider query for `tier`.
///
/// Compatible tiers first swap every whole-word occurrence of `brand` in the
/// text for the tier's substitute brand.
#[must_use]
pub fn build_tier_query(tier: &SearchTier, text: &str, brand: Option<&str>) -> String {
    match (tier.kind, brand, tier.substitute_brand.as_deref()) {
        (TierKind::Compatible, Some(brand), Some(substitute)) => {
            let rewritten = replace_word(text, brand, substitute);
            build_site_query(&rewritten, &tier.sites)
        }
        _ => build_site_query(text, &tier.sites),
    }
}

fn sanitize_phrase(text: &str) -> String {
    text.replace('"', "").split_whitespace().collect::<Vec<_>>().join(" ")
}

fn append_sites(mut query: String, sites: &[String]) -> String {
    if sites.is_empty() {
        return query;
    }
    let filters = sites
        .iter()
        .map(|s| format!("site:{s}"))
        .collect::<Vec<_>>()
        .join(" OR ");
    query.push(' ');
    query.push_str(&filters);
    query
}
