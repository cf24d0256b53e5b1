//! Research configuration: global timeout and per-engine overrides.

use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{engine::EngineId, error::ResearchError};

pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct ResearchConfig {
    /// Per-call timeout applied to engines that don't set their own.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub engines: EnginesConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct EnginesConfig {
    pub openai: Option<EngineSettings>,
    pub perplexity: Option<EngineSettings>,
    pub kimi: Option<EngineSettings>,
    pub gemini: Option<EngineSettings>,
}

fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let p = url.path().to_string();
        url.set_path(&(p + "/"));
    }
    url
}

fn deserialize_base_url<'de, D>(deserializer: D) -> Result<Option<Url>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let url = Option::<Url>::deserialize(deserializer)?;
    Ok(url.map(normalize_base_url))
}

/// Optional overrides for a single engine. Unset fields use the engine's
/// built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct EngineSettings {
    /// Always treated as a directory: a missing trailing slash is added.
    #[serde(default, deserialize_with = "deserialize_base_url")]
    pub base_url: Option<Url>,
    pub model: Option<String>,
    pub system: Option<String>,
    pub temperature: Option<f32>,
    pub timeout_seconds: Option<u64>,
}

/// Fully resolved parameters for one engine call.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineParams {
    pub base_url: Url,
    pub model: String,
    pub system: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl ResearchConfig {
    /// Load a config from a `.toml` or `.json` file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ResearchError> {
        let p = path.as_ref();
        if !p.exists() {
            return Err(ResearchError::ConfigError(format!(
                "Config file not found at: {}",
                p.display()
            )));
        }
        let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
        let content = fs::read_to_string(p)?;

        let config = match ext {
            "json" => serde_json::from_str(&content)?,
            "toml" => toml::from_str(&content)?,
            _ => {
                return Err(ResearchError::ConfigError(format!(
                    "Unsupported config format: {ext}"
                )));
            }
        };
        Ok(config)
    }

    /// `from_path` when a path is given, built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ResearchError> {
        match path {
            Some(p) => Self::from_path(p),
            None => Ok(Self::default()),
        }
    }

    pub fn settings(&self, id: EngineId) -> Option<&EngineSettings> {
        match id {
            EngineId::OpenAI => self.engines.openai.as_ref(),
            EngineId::Perplexity => self.engines.perplexity.as_ref(),
            EngineId::Kimi => self.engines.kimi.as_ref(),
            EngineId::Gemini => self.engines.gemini.as_ref(),
        }
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Merge the overrides for `id` over its built-in defaults.
    pub fn params(&self, id: EngineId) -> Result<EngineParams, ResearchError> {
        let settings = self.settings(id).cloned().unwrap_or_default();
        let base_url = match settings.base_url {
            Some(url) => normalize_base_url(url),
            None => Url::parse(id.default_base_url())?,
        };
        Ok(EngineParams {
            base_url,
            model: settings
                .model
                .unwrap_or_else(|| id.default_model().to_string()),
            system: settings
                .system
                .unwrap_or_else(|| id.system_instruction().to_string()),
            temperature: settings.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            timeout: settings
                .timeout_seconds
                .map(Duration::from_secs)
                .unwrap_or_else(|| self.default_timeout()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::{Gemini, OpenAICompatible};
    use crate::http::HTTPEngine;
    use std::io::Write;
    use tempfile::Builder;

    fn write_config(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_come_from_the_engine() {
        let params = ResearchConfig::default().params(EngineId::Kimi).unwrap();
        assert_eq!(params.base_url.as_str(), "https://api.moonshot.cn/v1/");
        assert_eq!(params.model, "moonshot-v1-8k");
        assert_eq!(params.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(params.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(params.system.starts_with("You are Kimi K2"));
    }

    #[test]
    fn loads_toml_overrides() {
        let file = write_config(
            ".toml",
            r#"
timeout_seconds = 30

[engines.openai]
model = "gpt-4o"
base_url = "http://localhost:9000/v1/"

[engines.gemini]
timeout_seconds = 5
"#,
        );
        let config = ResearchConfig::from_path(file.path()).unwrap();

        let openai = config.params(EngineId::OpenAI).unwrap();
        assert_eq!(openai.model, "gpt-4o");
        assert_eq!(openai.base_url.as_str(), "http://localhost:9000/v1/");
        assert_eq!(openai.timeout, Duration::from_secs(30));

        let gemini = config.params(EngineId::Gemini).unwrap();
        assert_eq!(gemini.model, "gemini-1.5-pro");
        assert_eq!(gemini.timeout, Duration::from_secs(5));
    }

    #[test]
    fn base_url_is_normalized_to_trailing_slash() {
        let file = write_config(
            ".toml",
            r#"
[engines.openai]
base_url = "http://localhost:9000/v1"

[engines.gemini]
base_url = "http://localhost:9000/v1beta/models"
"#,
        );
        let config = ResearchConfig::from_path(file.path()).unwrap();

        let openai = config.params(EngineId::OpenAI).unwrap();
        assert_eq!(openai.base_url.as_str(), "http://localhost:9000/v1/");
        let req = OpenAICompatible::new(EngineId::OpenAI, "k", openai)
            .chat_request("q")
            .unwrap();
        assert_eq!(req.uri(), "http://localhost:9000/v1/chat/completions");

        let req = Gemini::new("k", config.params(EngineId::Gemini).unwrap())
            .chat_request("q")
            .unwrap();
        assert_eq!(
            req.uri(),
            "http://localhost:9000/v1beta/models/gemini-1.5-pro:generateContent"
        );
    }

    #[test]
    fn programmatic_base_url_is_normalized_too() {
        let config = ResearchConfig {
            engines: EnginesConfig {
                kimi: Some(EngineSettings {
                    base_url: Some(Url::parse("http://localhost:9000/v1").unwrap()),
                    ..Default::default()
                }),
                ..Default::default()
            },
            ..Default::default()
        };
        let kimi = config.params(EngineId::Kimi).unwrap();
        assert_eq!(kimi.base_url.as_str(), "http://localhost:9000/v1/");
    }

    #[test]
    fn loads_json() {
        let file = write_config(".json", r#"{"engines":{"perplexity":{"temperature":0.7}}}"#);
        let config = ResearchConfig::from_path(file.path()).unwrap();
        assert_eq!(config.params(EngineId::Perplexity).unwrap().temperature, 0.7);
    }

    #[test]
    fn unknown_engine_is_rejected() {
        let file = write_config(".toml", "[engines.claude]\nmodel = \"x\"\n");
        assert!(ResearchConfig::from_path(file.path()).is_err());
    }

    #[test]
    fn unsupported_extension_and_missing_file_error() {
        let file = write_config(".yaml", "engines: {}");
        assert!(matches!(
            ResearchConfig::from_path(file.path()),
            Err(ResearchError::ConfigError(_))
        ));
        assert!(matches!(
            ResearchConfig::from_path("/definitely/not/here.toml"),
            Err(ResearchError::ConfigError(_))
        ));
    }

    #[test]
    fn load_without_path_is_default() {
        assert_eq!(ResearchConfig::load(None).unwrap(), ResearchConfig::default());
    }
}
