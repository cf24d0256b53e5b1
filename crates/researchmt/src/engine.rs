//! Engine identifiers and the per-engine result record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of research engines.
///
/// Variant order matches [`ENGINE_ORDER`], so maps keyed by `EngineId`
/// iterate in the same order as the tool comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineId {
    OpenAI,
    Perplexity,
    Kimi,
    Gemini,
}

/// Dispatch and reporting order of the engines.
pub const ENGINE_ORDER: [EngineId; 4] = [
    EngineId::OpenAI,
    EngineId::Perplexity,
    EngineId::Kimi,
    EngineId::Gemini,
];

impl EngineId {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineId::OpenAI => "openai",
            EngineId::Perplexity => "perplexity",
            EngineId::Kimi => "kimi",
            EngineId::Gemini => "gemini",
        }
    }

    /// Human readable name used in report lines.
    pub fn label(&self) -> &'static str {
        match self {
            EngineId::OpenAI => "OpenAI Deep Research",
            EngineId::Perplexity => "Perplexity Deep Research",
            EngineId::Kimi => "Kimi K2",
            EngineId::Gemini => "Gemini 2.5 Pro",
        }
    }

    /// Environment variables that may hold the engine credential, in lookup
    /// order. The first name is the one reported when none is set.
    pub fn api_key_names(&self) -> &'static [&'static str] {
        match self {
            EngineId::OpenAI => &["OPENAI_API_KEY"],
            EngineId::Perplexity => &["PPLX_API_KEY", "PERPLEXITY_API_KEY"],
            EngineId::Kimi => &["KIMI_API_KEY", "MOONSHOT_API_KEY"],
            EngineId::Gemini => &["GOOGLE_API_KEY", "GEMINI_API_KEY"],
        }
    }

    pub fn system_instruction(&self) -> &'static str {
        match self {
            EngineId::OpenAI => {
                "You are a deep research engine. Provide concise, evidence-oriented bullets and note uncertainties."
            }
            EngineId::Perplexity => {
                "Act as a deep research engine. Provide sourced, bullet-point answers with uncertainties."
            }
            EngineId::Kimi => {
                "You are Kimi K2 style deep researcher. Provide structured, concise bullets and cite uncertainty."
            }
            EngineId::Gemini => {
                "Act as Gemini 2.5 Pro deep researcher. Provide bullet points, evidence focus."
            }
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            EngineId::OpenAI => "https://api.openai.com/v1/",
            EngineId::Perplexity => "https://api.perplexity.ai/",
            EngineId::Kimi => "https://api.moonshot.cn/v1/",
            EngineId::Gemini => "https://generativelanguage.googleapis.com/v1beta/models/",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            EngineId::OpenAI => "gpt-4o-mini",
            EngineId::Perplexity => "sonar-reasoning-pro",
            EngineId::Kimi => "moonshot-v1-8k",
            EngineId::Gemini => "gemini-1.5-pro",
        }
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome class of a single engine call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineStatus {
    Ok,
    Error,
    Unavailable,
}

/// Result of one engine call, created once and never mutated.
///
/// Use the constructors: an `ok` result always carries claims (possibly
/// empty) and the other statuses never do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineResult {
    pub engine_id: EngineId,
    pub status: EngineStatus,
    pub elapsed_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claims: Option<Vec<String>>,
}

impl EngineResult {
    pub fn ok(engine_id: EngineId, elapsed_ms: u64, raw_text: String, claims: Vec<String>) -> Self {
        Self {
            engine_id,
            status: EngineStatus::Ok,
            elapsed_ms: Some(elapsed_ms),
            message: None,
            raw_text: Some(raw_text),
            claims: Some(claims),
        }
    }

    pub fn error(engine_id: EngineId, elapsed_ms: Option<u64>, message: impl Into<String>) -> Self {
        Self {
            engine_id,
            status: EngineStatus::Error,
            elapsed_ms,
            message: Some(message.into()),
            raw_text: None,
            claims: None,
        }
    }

    pub fn unavailable(engine_id: EngineId, message: impl Into<String>) -> Self {
        Self {
            engine_id,
            status: EngineStatus::Unavailable,
            elapsed_ms: None,
            message: Some(message.into()),
            raw_text: None,
            claims: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == EngineStatus::Ok
    }

    /// Claims of an `ok` result; empty for every other status.
    pub fn claims(&self) -> &[String] {
        self.claims.as_deref().unwrap_or_default()
    }

    pub fn state(&self) -> EngineState {
        EngineState {
            engine_id: self.engine_id,
            status: self.status,
            elapsed_ms: self.elapsed_ms,
            message: self.message.clone(),
        }
    }
}

/// UI-facing projection of an [`EngineResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineState {
    pub engine_id: EngineId,
    pub status: EngineStatus,
    pub elapsed_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
