//! researchmt fans one research question out to several LLM engines and
//! synthesizes their answers into a single report.
//!
//! # Overview
//! A request goes through these steps:
//!
//! - Validate the question and compose the prompt (sub-question outline plus
//!   formatting instructions)
//! - Call OpenAI, Perplexity, Kimi and Gemini concurrently; each call is
//!   contained in its own [`engine::EngineResult`]
//! - Synthesize: deduplicated findings, consensus themes, conflicting claims,
//!   risks and recommendations
//!
//! # Architecture
//! Engines are sans-IO ([`http::HTTPEngine`]): they build and parse
//! `http` requests. A [`outbound::Transport`] executes them. The synthesis
//! modules are pure functions over engine results.

/// Claim extraction from free-text answers
pub mod claims;

/// Research configuration and per-engine overrides
pub mod config;

/// Cross-engine agreement
pub mod consensus;

/// Polarity-opposed claims across engines
pub mod conflict;

/// Near-duplicate removal
pub mod dedupe;

/// Engine identifiers and results
pub mod engine;

/// Engine implementations and credential lookup
pub mod engines;

pub mod error;

/// Sans-IO request/response contract for engines
pub mod http;

pub mod outbound;

/// Report synthesis
pub mod report;

/// Validation and the concurrent research runner
pub mod research;

/// Token-set similarity
pub mod similarity;

/// Sub-question outline and prompt composition
pub mod subquestion;

pub use engine::{ENGINE_ORDER, EngineId, EngineResult, EngineState, EngineStatus};
pub use error::ResearchError;
pub use report::{Report, synthesize};
pub use research::{ResearchRequest, ResearchResponse, Researcher, validate_question};
