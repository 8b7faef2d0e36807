//! Whole-word matching primitives shared by the relevance validator, the brand
//! resolver, and the compatible-brand query rewrite.
//!
//! A match counts only when the characters on both sides are not alphanumeric
//! (or are the ends of the text), so `"rim"` does not match inside `"primero"`
//! while `"brake"` matches in `"brake, rotor"`. Comparison folds ASCII case only;
//! callers that need Unicode folding lowercase the text first.

/// Byte offsets of every non-overlapping whole-word occurrence of `word` in `text`.
pub(crate) fn word_positions(text: &str, word: &str) -> Vec<usize> {
    let hay = text.as_bytes();
    let needle = word.as_bytes();
    let mut positions = Vec::new();

    if needle.is_empty() || hay.len() < needle.len() {
        return positions;
    }

    let mut i = 0usize;
    while i + needle.len() <= hay.len() {
        // A byte-wise match of a complete UTF-8 needle always starts and ends
        // on char boundaries, so the slicing below cannot split a character.
        if hay[i..i + needle.len()].eq_ignore_ascii_case(needle)
            && boundary_before(text, i)
            && boundary_after(text, i + needle.len())
        {
            positions.push(i);
            i += needle.len();
        } else {
            i += 1;
        }
    }

    positions
}

/// Returns `true` if `word` occurs in `text` as a whole word.
pub(crate) fn contains_word(text: &str, word: &str) -> bool {
    !word_positions(text, word).is_empty()
}

/// Replaces every whole-word, ASCII-case-insensitive occurrence of `word`
/// with `replacement`.
pub(crate) fn replace_word(text: &str, word: &str, replacement: &str) -> String {
    let positions = word_positions(text, word);
    if positions.is_empty() {
        return text.to_owned();
    }

    let mut out = String::with_capacity(text.len() + positions.len() * replacement.len());
    let mut last = 0usize;
    for pos in positions {
        out.push_str(&text[last..pos]);
        out.push_str(replacement);
        last = pos + word.len();
    }
    out.push_str(&text[last..]);
    out
}

/// Lowercases and collapses runs of whitespace to single spaces.
pub(crate) fn normalize_whitespace_lower(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn boundary_before(text: &str, pos: usize) -> bool {
    pos == 0
        || !text[..pos]
            .chars()
            .next_back()
            .is_some_and(char::is_alphanumeric)
}

fn boundary_after(text: &str, pos: usize) -> bool {
    pos >= text.len()
        || !text[pos..]
            .chars()
            .next()
            .is_some_and(char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_whole_word_only() {
        assert!(contains_word("need a new brake pad", "brake"));
        assert!(!contains_word("el primero", "rim"));
        assert!(!contains_word("brakes", "brake"));
    }

    #[test]
    fn punctuation_counts_as_boundary() {
        assert!(contains_word("pads, brake.", "brake"));
        assert!(contains_word("(ford)", "ford"));
        assert!(contains_word("ford's mustang", "ford"));
    }

    #[test]
    fn hyphenated_tokens_match_as_units() {
        assert!(contains_word("2018 ford f-150 rotor", "f-150"));
        assert!(contains_word("front cv-joint", "cv-joint"));
        assert!(!contains_word("f-1500", "f-150"));
    }

    #[test]
    fn multi_word_tokens_match() {
        assert!(contains_word("2015 jeep grand cherokee strut", "grand cherokee"));
    }

    #[test]
    fn folds_ascii_case() {
        assert!(contains_word("FORD Ranger", "ford"));
    }

    #[test]
    fn non_ascii_neighbours_are_respected() {
        // 'é' is alphanumeric, so "motor" inside "motoré" is not a whole word.
        assert!(!contains_word("motoré", "motor"));
        assert!(contains_word("motor – nuevo", "motor"));
    }

    #[test]
    fn empty_inputs_never_match() {
        assert!(!contains_word("", "brake"));
        assert!(!contains_word("brake", ""));
        assert!(!contains_word("ab", "abc"));
    }

    #[test]
    fn word_positions_are_non_overlapping() {
        assert_eq!(word_positions("ford ford-ford", "ford"), vec![0, 5, 10]);
    }

    #[test]
    fn replace_word_swaps_every_occurrence() {
        assert_eq!(
            replace_word("Ford brake pads for ford f-150", "ford", "lincoln"),
            "lincoln brake pads for lincoln f-150"
        );
    }

    #[test]
    fn replace_word_leaves_embedded_matches() {
        assert_eq!(
            replace_word("fordson tractor ford", "ford", "lincoln"),
            "fordson tractor lincoln"
        );
    }

    #[test]
    fn replace_word_without_match_is_identity() {
        assert_eq!(replace_word("brake pads", "ford", "lincoln"), "brake pads");
    }

    #[test]
    fn normalize_whitespace_lower_collapses_runs() {
        assert_eq!(
            normalize_whitespace_lower("  Brake   Pads\tFORD "),
            "brake pads ford"
        );
    }
}
