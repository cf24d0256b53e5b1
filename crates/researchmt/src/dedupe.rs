use crate::similarity::similarity;

/// Similarity at or above which two claims count as near-duplicates.
pub const DEFAULT_DEDUPE_THRESHOLD: f64 = 0.7;

/// Greedy, order-preserving near-duplicate filter.
///
/// A claim is kept only if it scores strictly below `threshold` against every
/// claim kept before it. Kept claims are never replaced by later ones.
pub fn dedupe<S: AsRef<str>>(claims: &[S], threshold: f64) -> Vec<String> {
    let mut kept: Vec<String> = Vec::new();
    for claim in claims {
        let claim = claim.as_ref();
        if kept.iter().all(|k| similarity(k, claim) < threshold) {
            kept.push(claim.to_string());
        }
    }
    kept
}
