//! Report synthesis: a pure transform from engine results to a [`Report`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::conflict::{Conflict, find_conflicts};
use crate::consensus::find_consensus;
use crate::dedupe::{DEFAULT_DEDUPE_THRESHOLD, dedupe};
use crate::engine::{ENGINE_ORDER, EngineId, EngineResult, EngineStatus};

pub const MAX_FINDINGS: usize = 40;
pub const MAX_RISKS: usize = 10;
const SUMMARY_CONSENSUS: usize = 5;
const SUMMARY_CONFLICTS: usize = 3;

pub const RECOMMEND_CONSENSUS: &str =
    "Prioritize actions aligned to consensus themes; validate with primary sources.";
pub const RECOMMEND_CONFLICTS: &str =
    "Investigate conflicts: trace claims to sources; run follow-up targeted queries.";
pub const RECOMMEND_CREDENTIALS: &str =
    "Provide missing API keys to increase coverage and confidence.";
pub const RECOMMEND_UNCERTAINTY: &str =
    "Document uncertainties explicitly; avoid overcommitting where evidence diverges.";

/// Audit snapshot of one engine result. Display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineDiagnostic {
    pub status: EngineStatus,
    pub message: Option<String>,
    pub elapsed_ms: Option<u64>,
    pub claims: Option<Vec<String>>,
    pub raw_text: Option<String>,
}

impl From<&EngineResult> for EngineDiagnostic {
    fn from(r: &EngineResult) -> Self {
        Self {
            status: r.status,
            message: r.message.clone(),
            elapsed_ms: r.elapsed_ms,
            claims: r.claims.clone(),
            raw_text: r.raw_text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub executive_summary: String,
    pub key_findings_by_theme: Vec<String>,
    pub tool_comparison: Vec<String>,
    pub risks: Vec<String>,
    pub recommendations: Vec<String>,
    pub raw: BTreeMap<EngineId, EngineDiagnostic>,
}

/// Build the report for `question` from every engine's result.
pub fn synthesize(question: &str, results: &[EngineResult]) -> Report {
    let ok_count = results.iter().filter(|r| r.is_ok()).count();
    let missing = results.len() - ok_count;

    let findings: Vec<&str> = results
        .iter()
        .filter(|r| r.is_ok())
        .flat_map(|r| r.claims())
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();
    let mut findings = dedupe(&findings, DEFAULT_DEDUPE_THRESHOLD);
    findings.truncate(MAX_FINDINGS);

    let consensus = find_consensus(results);
    let conflicts = find_conflicts(results);

    Report {
        executive_summary: executive_summary(question, &consensus, &conflicts, ok_count, missing),
        key_findings_by_theme: findings.iter().map(|f| format!("• {f}")).collect(),
        tool_comparison: tool_comparison(results),
        risks: risks(&conflicts, missing),
        recommendations: recommendations(&consensus, &conflicts, missing),
        raw: results
            .iter()
            .map(|r| (r.engine_id, EngineDiagnostic::from(r)))
            .collect(),
    }
}

fn executive_summary(
    question: &str,
    consensus: &[String],
    conflicts: &[Conflict],
    ok_count: usize,
    missing: usize,
) -> String {
    let mut parts = vec![format!("Question: {question}")];
    if !consensus.is_empty() {
        let themes: Vec<&str> = consensus
            .iter()
            .take(SUMMARY_CONSENSUS)
            .map(String::as_str)
            .collect();
        parts.push(format!("Consensus themes: {}.", themes.join("; ")));
    }
    if !conflicts.is_empty() {
        let pairs: Vec<String> = conflicts
            .iter()
            .take(SUMMARY_CONFLICTS)
            .map(Conflict::short)
            .collect();
        parts.push(format!("Notable disagreements: {}.", pairs.join(" | ")));
    }
    if missing > 0 {
        parts.push(format!(
            "Coverage: {ok_count} engines responded; {missing} unavailable."
        ));
    } else {
        parts.push(format!("Coverage: {ok_count} engines responded."));
    }
    parts.join(" ")
}

/// One line per engine in [`ENGINE_ORDER`], whatever order results arrived in.
fn tool_comparison(results: &[EngineResult]) -> Vec<String> {
    ENGINE_ORDER
        .iter()
        .flat_map(|id| results.iter().filter(move |r| r.engine_id == *id))
        .map(comparison_line)
        .collect()
}

fn comparison_line(r: &EngineResult) -> String {
    let label = r.engine_id.label();
    match r.status {
        EngineStatus::Ok => format!(
            "{label}: responded in {}ms with {} bullets.",
            r.elapsed_ms.unwrap_or_default(),
            r.claims().len()
        ),
        EngineStatus::Unavailable => format!("{label}: unavailable (missing API key)."),
        EngineStatus::Error => format!(
            "{label}: error ({}).",
            r.message.as_deref().filter(|m| !m.is_empty()).unwrap_or("unknown")
        ),
    }
}

fn risks(conflicts: &[Conflict], missing: usize) -> Vec<String> {
    let mut risks: Vec<String> = conflicts
        .iter()
        .map(|c| {
            format!(
                "Conflicting statements: {}: \"{}\" vs \"{}\".",
                c.short(),
                c.claim_a,
                c.claim_b
            )
        })
        .collect();
    if missing > 0 {
        risks.push(format!(
            "{missing} engines unavailable; synthesis confidence reduced. Supply API keys to improve coverage."
        ));
    }
    risks.truncate(MAX_RISKS);
    risks
}

fn recommendations(consensus: &[String], conflicts: &[Conflict], missing: usize) -> Vec<String> {
    let mut recs = Vec::new();
    if !consensus.is_empty() {
        recs.push(RECOMMEND_CONSENSUS.to_string());
    }
    if !conflicts.is_empty() {
        recs.push(RECOMMEND_CONFLICTS.to_string());
    }
    if missing > 0 {
        recs.push(RECOMMEND_CREDENTIALS.to_string());
    }
    recs.push(RECOMMEND_UNCERTAINTY.to_string());
    recs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(id: EngineId, elapsed: u64, claims: &[&str]) -> EngineResult {
        EngineResult::ok(
            id,
            elapsed,
            claims.join("\n"),
            claims.iter().map(|c| c.to_string()).collect(),
        )
    }

    fn all_unavailable() -> Vec<EngineResult> {
        ENGINE_ORDER
            .iter()
            .map(|id| EngineResult::unavailable(*id, format!("{} not set", id.api_key_names()[0])))
            .collect()
    }

    #[test]
    fn all_engines_unavailable() {
        let report = synthesize("Is fusion viable?", &all_unavailable());

        assert_eq!(report.tool_comparison.len(), 4);
        assert!(
            report
                .tool_comparison
                .iter()
                .all(|l| l.ends_with("unavailable (missing API key)."))
        );
        assert!(report.key_findings_by_theme.is_empty());
        assert_eq!(
            report.risks,
            vec!["4 engines unavailable; synthesis confidence reduced. Supply API keys to improve coverage."]
        );
        assert_eq!(
            report.recommendations,
            vec![RECOMMEND_CREDENTIALS, RECOMMEND_UNCERTAINTY]
        );
        assert_eq!(
            report.executive_summary,
            "Question: Is fusion viable? Coverage: 0 engines responded; 4 unavailable."
        );
        assert_eq!(report.raw.len(), 4);
    }

    #[test]
    fn full_report_from_mixed_results() {
        let results = vec![
            ok(
                EngineId::OpenAI,
                1200,
                &[
                    "Market adoption is increasing",
                    "Regulators consider this technology safe for widespread consumer adoption today",
                ],
            ),
            EngineResult::error(EngineId::Perplexity, Some(300), "HTTP 401: bad key"),
            ok(
                EngineId::Kimi,
                900,
                &[
                    "Market adoption is increasing rapidly",
                    "Independent audits show technology risks remain; never assume consumer safety",
                ],
            ),
            EngineResult::unavailable(EngineId::Gemini, "GOOGLE_API_KEY not set"),
        ];
        let report = synthesize("Where is the market heading?", &results);

        assert_eq!(
            report.tool_comparison,
            vec![
                "OpenAI Deep Research: responded in 1200ms with 2 bullets.",
                "Perplexity Deep Research: error (HTTP 401: bad key).",
                "Kimi K2: responded in 900ms with 2 bullets.",
                "Gemini 2.5 Pro: unavailable (missing API key).",
            ]
        );
        assert_eq!(
            report.key_findings_by_theme,
            vec![
                "• Market adoption is increasing",
                "• Regulators consider this technology safe for widespread consumer adoption today",
                "• Independent audits show technology risks remain; never assume consumer safety",
            ]
        );
        assert_eq!(report.risks.len(), 2);
        assert!(report.risks[0].starts_with("Conflicting statements: openai vs kimi: \"Regulators"));
        assert_eq!(
            report.risks[1],
            "2 engines unavailable; synthesis confidence reduced. Supply API keys to improve coverage."
        );
        assert_eq!(
            report.recommendations,
            vec![
                RECOMMEND_CONSENSUS,
                RECOMMEND_CONFLICTS,
                RECOMMEND_CREDENTIALS,
                RECOMMEND_UNCERTAINTY
            ]
        );
        assert_eq!(
            report.executive_summary,
            "Question: Where is the market heading? \
             Consensus themes: Market adoption is increasing. \
             Notable disagreements: openai vs kimi. \
             Coverage: 2 engines responded; 2 unavailable."
        );
    }

    #[test]
    fn comparison_follows_engine_order_not_result_order() {
        let mut results = all_unavailable();
        results.reverse();
        let report = synthesize("ordering check", &results);
        assert!(report.tool_comparison[0].starts_with("OpenAI Deep Research"));
        assert!(report.tool_comparison[3].starts_with("Gemini 2.5 Pro"));
    }

    #[test]
    fn error_without_message_reports_unknown() {
        let mut failed = EngineResult::error(EngineId::Kimi, None, "");
        failed.message = None;
        let report = synthesize("q?", &[failed]);
        assert_eq!(report.tool_comparison, vec!["Kimi K2: error (unknown)."]);
    }

    #[test]
    fn all_ok_has_no_credential_lines() {
        let results: Vec<EngineResult> = ENGINE_ORDER
            .iter()
            .map(|id| ok(*id, 10, &["Distinct finding about batteries", "Another point on grids"]))
            .collect();
        let report = synthesize("Energy storage outlook", &results);
        assert!(report.executive_summary.ends_with("Coverage: 4 engines responded."));
        assert!(report.risks.is_empty());
        assert_eq!(
            report.recommendations,
            vec![RECOMMEND_CONSENSUS, RECOMMEND_UNCERTAINTY]
        );
        assert_eq!(report.key_findings_by_theme.len(), 2);
    }

    #[test]
    fn findings_are_capped() {
        let claims: Vec<String> = (0..60).map(|i| format!("unique{i} finding{i} words{i}")).collect();
        let claims: Vec<&str> = claims.iter().map(String::as_str).collect();
        let report = synthesize("cap check", &[ok(EngineId::OpenAI, 1, &claims)]);
        assert_eq!(report.key_findings_by_theme.len(), MAX_FINDINGS);
    }

    #[test]
    fn risks_are_capped_at_ten() {
        let conflicts: Vec<Conflict> = (0..12)
            .map(|i| Conflict {
                engine_a: EngineId::OpenAI,
                engine_b: EngineId::Kimi,
                claim_a: format!("a{i}"),
                claim_b: format!("b{i}"),
            })
            .collect();
        let risks = risks(&conflicts, 1);
        assert_eq!(risks.len(), MAX_RISKS);
        assert!(risks.iter().all(|r| r.starts_with("Conflicting statements")));
    }

    #[test]
    fn synthesis_is_idempotent_and_serializes_camel_case() {
        let results = vec![ok(EngineId::Gemini, 5, &["One", "Two", "Three"])];
        let a = synthesize("repeat", &results);
        let b = synthesize("repeat", &results);
        assert_eq!(a, b);

        let value = serde_json::to_value(&a).unwrap();
        assert!(value.get("executiveSummary").is_some());
        assert!(value.get("keyFindingsByTheme").is_some());
        assert_eq!(value["raw"]["gemini"]["status"], "ok");
        assert_eq!(value["raw"]["gemini"]["elapsedMs"], 5);
    }
}
