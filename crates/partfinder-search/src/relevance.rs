//! Decides whether a free-text query plausibly names an auto part.

use std::sync::LazyLock;

use partfinder_core::Registry;
use regex::Regex;

use crate::text::contains_word;

/// Model years accepted as evidence of a vehicle query: 1960 through 2030.
static MODEL_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:19[6-9][0-9]|20[0-2][0-9]|2030)\b").expect("valid model year regex")
});

/// Returns `true` if `query` mentions a part keyword, a registry brand, or a
/// plausible model year, each as a whole word.
///
/// Blank queries are never valid. A `false` result is a hard rejection for
/// the caller, not a warning.
#[must_use]
pub fn is_valid_auto_part_query(query: &str, registry: &Registry) -> bool {
    let lower = query.trim().to_lowercase();
    if lower.is_empty() {
        return false;
    }

    if registry.keywords().any(|k| contains_word(&lower, k)) {
        return true;
    }

    if registry.brand_names().any(|b| contains_word(&lower, b)) {
        return true;
    }

    if MODEL_YEAR.is_match(&lower) {
        return true;
    }

    tracing::info!(query, "query rejected: does not look like an auto part search");
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        Registry::bundled().expect("bundled registry parses")
    }

    #[test]
    fn accepts_english_keyword() {
        assert!(is_valid_auto_part_query("need a new brake pad", &registry()));
    }

    #[test]
    fn accepts_spanish_keyword() {
        assert!(is_valid_auto_part_query("filtro de aceite", &registry()));
    }

    #[test]
    fn rejects_unrelated_spanish_text() {
        assert!(!is_valid_auto_part_query("flores para mi jardin", &registry()));
    }

    #[test]
    fn keyword_inside_longer_word_does_not_count() {
        // "rim" and "rin" are keywords; neither may match inside "primero".
        assert!(!is_valid_auto_part_query("el primero lugar", &registry()));
    }

    #[test]
    fn keyword_next_to_punctuation_counts() {
        assert!(is_valid_auto_part_query("front brake, please", &registry()));
    }

    #[test]
    fn accepts_brand_alone() {
        assert!(is_valid_auto_part_query("something for my Toyota", &registry()));
    }

    #[test]
    fn accepts_brand_and_year() {
        assert!(is_valid_auto_part_query("ford f150 2018", &registry()));
    }

    #[test]
    fn accepts_year_in_range_without_keyword() {
        assert!(is_valid_auto_part_query("1967 bicycle", &registry()));
        assert!(is_valid_auto_part_query("2030 concept", &registry()));
    }

    #[test]
    fn rejects_year_out_of_range() {
        assert!(!is_valid_auto_part_query("parts for 1950 bicycle", &registry()));
        assert!(!is_valid_auto_part_query("a 2031 bicycle", &registry()));
    }

    #[test]
    fn year_inside_longer_digit_run_does_not_count() {
        assert!(!is_valid_auto_part_query("order 120185 bicycle", &registry()));
    }

    #[test]
    fn rejects_blank_query() {
        assert!(!is_valid_auto_part_query("   ", &registry()));
        assert!(!is_valid_auto_part_query("", &registry()));
    }
}
