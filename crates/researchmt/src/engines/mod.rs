//! Engine construction and credential lookup.
//!
//! Each [`EngineId`] maps to exactly one [`HTTPEngine`] implementation in
//! [`build_engine`]. Adding an engine means adding a variant and its arm.

use std::collections::HashMap;

use crate::{
    config::EngineParams,
    engine::{ENGINE_ORDER, EngineId},
    http::HTTPEngine,
};

pub mod gemini;
pub mod openai;

pub use gemini::Gemini;
pub use openai::OpenAICompatible;

/// Snapshot of the credential variables the engines know about.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    vars: HashMap<String, String>,
}

impl Credentials {
    /// Read every engine's credential variables from the process environment.
    pub fn from_env() -> Self {
        let vars = ENGINE_ORDER
            .iter()
            .flat_map(|id| id.api_key_names().iter())
            .filter_map(|name| std::env::var(name).ok().map(|v| (name.to_string(), v)))
            .collect();
        Self { vars }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// First non-blank credential among the engine's variable names.
    pub fn api_key(&self, id: EngineId) -> Option<&str> {
        id.api_key_names()
            .iter()
            .filter_map(|name| self.vars.get(*name))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
    }

    /// Status message used when no credential is configured.
    pub fn missing_message(id: EngineId) -> String {
        format!("{} not set", id.api_key_names()[0])
    }
}

pub fn build_engine(id: EngineId, api_key: &str, params: EngineParams) -> Box<dyn HTTPEngine> {
    match id {
        EngineId::OpenAI | EngineId::Perplexity | EngineId::Kimi => {
            Box::new(OpenAICompatible::new(id, api_key, params))
        }
        EngineId::Gemini => Box::new(Gemini::new(api_key, params)),
    }
}
