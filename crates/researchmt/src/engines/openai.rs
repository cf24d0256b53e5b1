//! Engines speaking the OpenAI chat-completions wire format: OpenAI itself,
//! Perplexity and Kimi (Moonshot).

use std::time::Duration;

use http::{
    Method, Request, Response,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};

use crate::{
    config::EngineParams,
    engine::EngineId,
    error::ResearchError,
    http::{HTTPEngine, handle_http_error},
};

pub struct OpenAICompatible {
    id: EngineId,
    api_key: String,
    params: EngineParams,
}

#[derive(Serialize, Debug)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize, Debug, Default)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatChoiceMessage>,
}

#[derive(Deserialize, Debug)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAICompatible {
    pub fn new(id: EngineId, api_key: impl Into<String>, params: EngineParams) -> Self {
        Self {
            id,
            api_key: api_key.into(),
            params,
        }
    }
}

impl HTTPEngine for OpenAICompatible {
    fn id(&self) -> EngineId {
        self.id
    }

    fn timeout(&self) -> Duration {
        self.params.timeout
    }

    fn chat_request(&self, prompt: &str) -> Result<Request<Vec<u8>>, ResearchError> {
        let body = ChatRequest {
            model: &self.params.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.params.system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.params.temperature,
        };
        let json_body = serde_json::to_vec(&body)?;
        let url = self.params.base_url.join("chat/completions")?;

        Ok(Request::builder()
            .method(Method::POST)
            .uri(url.as_str())
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .body(json_body)?)
    }

    fn parse_chat(&self, resp: Response<Vec<u8>>) -> Result<String, ResearchError> {
        handle_http_error(&resp)?;

        let parsed: ChatResponse =
            serde_json::from_slice(resp.body()).map_err(|e| ResearchError::ResponseFormatError {
                message: format!("Failed to decode {} response: {}", self.id, e),
                raw_response: String::from_utf8_lossy(resp.body()).into_owned(),
            })?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default())
    }
}
