//! Consensus detection across the pooled claims of all successful engines.

use crate::dedupe::{DEFAULT_DEDUPE_THRESHOLD, dedupe};
use crate::engine::{EngineId, EngineResult};
use crate::similarity::similarity;

/// Similarity at or above which two claims count as the same statement.
/// Looser than the dedupe threshold so paraphrases still vote together.
pub const CONSENSUS_MATCH_THRESHOLD: f64 = 0.65;

/// Minimum votes, the claim itself included.
pub const MIN_VOTES: usize = 2;

pub const MAX_CONSENSUS: usize = 12;

/// A claim together with the engine that produced it.
#[derive(Debug, Clone, Copy)]
pub struct PooledClaim<'a> {
    pub engine_id: EngineId,
    pub text: &'a str,
}

/// All claims of `ok` results, in result order then claim order.
pub fn pool_claims(results: &[EngineResult]) -> Vec<PooledClaim<'_>> {
    results
        .iter()
        .filter(|r| r.is_ok())
        .flat_map(|r| {
            r.claims().iter().map(move |text| PooledClaim {
                engine_id: r.engine_id,
                text: text.as_str(),
            })
        })
        .collect()
}

/// Number of pooled claims matching `pool[index]`, counting itself.
///
/// Matches from the same engine count too.
pub fn votes(pool: &[PooledClaim<'_>], index: usize) -> usize {
    let base = pool[index].text;
    1 + pool
        .iter()
        .enumerate()
        .filter(|(j, other)| *j != index && similarity(base, other.text) >= CONSENSUS_MATCH_THRESHOLD)
        .count()
}

/// Claims corroborated by at least one other pooled claim, deduplicated and
/// capped at [`MAX_CONSENSUS`].
pub fn find_consensus(results: &[EngineResult]) -> Vec<String> {
    let pool = pool_claims(results);
    let qualifying: Vec<&str> = (0..pool.len())
        .filter(|&i| votes(&pool, i) >= MIN_VOTES)
        .map(|i| pool[i].text)
        .collect();

    let mut consensus = dedupe(&qualifying, DEFAULT_DEDUPE_THRESHOLD);
    consensus.truncate(MAX_CONSENSUS);
    consensus
}
