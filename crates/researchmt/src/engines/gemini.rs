//! Google Gemini `generateContent` engine.

use std::time::Duration;

use http::{Method, Request, Response, header::CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::{
    config::EngineParams,
    engine::EngineId,
    error::ResearchError,
    http::{HTTPEngine, handle_http_error},
};

const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct Gemini {
    api_key: String,
    params: EngineParams,
}

#[derive(Serialize, Debug)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize, Debug)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize, Debug)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize, Debug)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize, Debug)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize, Debug)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiResponseContent>,
}

#[derive(Deserialize, Debug)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize, Debug)]
struct GeminiResponsePart {
    #[serde(default)]
    text: String,
}

impl Gemini {
    pub fn new(api_key: impl Into<String>, params: EngineParams) -> Self {
        Self {
            api_key: api_key.into(),
            params,
        }
    }
}

impl HTTPEngine for Gemini {
    fn id(&self) -> EngineId {
        EngineId::Gemini
    }

    fn timeout(&self) -> Duration {
        self.params.timeout
    }

    /// Gemini has no system role here, so the instruction is prepended to
    /// the prompt text.
    fn chat_request(&self, prompt: &str) -> Result<Request<Vec<u8>>, ResearchError> {
        let text = format!("{}\n\n{}", self.params.system, prompt);
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: &text }],
            }],
            generation_config: GenerationConfig {
                temperature: self.params.temperature,
            },
        };
        let json_body = serde_json::to_vec(&body)?;

        // absolute path: a bare "model:method" segment would parse as a scheme
        let path = format!(
            "{}{}:generateContent",
            self.params.base_url.path(),
            self.params.model
        );
        let url = self.params.base_url.join(&path)?;

        Ok(Request::builder()
            .method(Method::POST)
            .uri(url.as_str())
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, self.api_key.as_str())
            .body(json_body)?)
    }

    fn parse_chat(&self, resp: Response<Vec<u8>>) -> Result<String, ResearchError> {
        handle_http_error(&resp)?;

        let parsed: GeminiResponse =
            serde_json::from_slice(resp.body()).map_err(|e| ResearchError::ResponseFormatError {
                message: format!("Failed to decode gemini response: {e}"),
                raw_response: String::from_utf8_lossy(resp.body()).into_owned(),
            })?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default();
        Ok(text)
    }
}
