//! Token-set Jaccard similarity, the only text comparison used by synthesis.

use std::collections::HashSet;

/// Tokens shorter than this many characters are ignored.
const MIN_TOKEN_LEN: usize = 3;

/// Lowercase ASCII alphanumeric tokens of `text` with at least
/// [`MIN_TOKEN_LEN`] characters. Every other character separates tokens.
pub fn tokens(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| t.len() >= MIN_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}

/// Jaccard index of the token sets of `a` and `b`, in `[0, 1]`.
///
/// Returns `0.0` when neither side has any token.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = tokens(a);
    let b = tokens(b);
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}
