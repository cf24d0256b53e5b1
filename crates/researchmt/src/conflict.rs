//! Conflict detection between claims of different engines.
//!
//! Two claims conflict when they talk about the same topic, are worded
//! differently, and exactly one of them is negated. Each condition alone is
//! too noisy to use.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::engine::{EngineId, EngineResult};
use crate::similarity::similarity;

/// Claims must score below this to be compared for polarity.
pub const MAX_CONFLICT_SIMILARITY: f64 = 0.2;

/// Shared 4+-letter words needed for two claims to share a topic.
pub const MIN_TOPIC_OVERLAP: usize = 2;

pub const MAX_CONFLICTS: usize = 8;

static NEGATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:no|not|never|unlikely|doesn['’]t|won['’]t)\b")
        .expect("negation pattern is valid")
});

static TOPIC_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z]{4,}").expect("topic word pattern is valid"));

/// Two polarity-opposed claims from two different engines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub engine_a: EngineId,
    pub engine_b: EngineId,
    pub claim_a: String,
    pub claim_b: String,
}

impl Conflict {
    /// `openai vs kimi`
    pub fn short(&self) -> String {
        format!("{} vs {}", self.engine_a, self.engine_b)
    }
}

pub fn is_negated(claim: &str) -> bool {
    NEGATION.is_match(claim)
}

fn topic_words(claim: &str) -> HashSet<String> {
    let lower = claim.to_lowercase();
    TOPIC_WORD
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Whether the two claims share at least [`MIN_TOPIC_OVERLAP`] topic words.
pub fn shares_topic(a: &str, b: &str) -> bool {
    let a = topic_words(a);
    let b = topic_words(b);
    a.intersection(&b).count() >= MIN_TOPIC_OVERLAP
}

pub fn is_conflicting(a: &str, b: &str) -> bool {
    similarity(a, b) < MAX_CONFLICT_SIMILARITY
        && is_negated(a) != is_negated(b)
        && shares_topic(a, b)
}

/// First [`MAX_CONFLICTS`] conflicting claim pairs across `ok` engines.
///
/// Engines are paired in result order; within a pair every claim of the
/// first engine is compared with every claim of the second. Results sharing
/// an engine id are never paired.
pub fn find_conflicts(results: &[EngineResult]) -> Vec<Conflict> {
    let ok: Vec<&EngineResult> = results.iter().filter(|r| r.is_ok()).collect();
    let mut conflicts = Vec::new();

    for (i, a) in ok.iter().enumerate() {
        // duplicate ids count as one engine
        for b in ok[i + 1..].iter().filter(|b| b.engine_id != a.engine_id) {
            for at in a.claims() {
                for bt in b.claims() {
                    if !is_conflicting(at, bt) {
                        continue;
                    }
                    conflicts.push(Conflict {
                        engine_a: a.engine_id,
                        engine_b: b.engine_id,
                        claim_a: at.clone(),
                        claim_b: bt.clone(),
                    });
                    if conflicts.len() == MAX_CONFLICTS {
                        return conflicts;
                    }
                }
            }
        }
    }
    conflicts
}
