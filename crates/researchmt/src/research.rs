//! The research runner: validate, prompt, fan out, synthesize.

use std::{sync::Arc, time::Instant};

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{Instrument, debug, info, info_span, instrument, warn};

use crate::{
    claims::extract_claims,
    config::ResearchConfig,
    engine::{ENGINE_ORDER, EngineId, EngineResult, EngineState},
    engines::{Credentials, build_engine},
    error::ResearchError,
    outbound::Transport,
    report::{Report, synthesize},
    subquestion::{build_prompt, generate_subquestions},
};

pub const MIN_QUESTION_CHARS: usize = 4;
pub const MAX_QUESTION_CHARS: usize = 4000;

/// Reject questions outside the accepted length range, counted in characters.
pub fn validate_question(question: &str) -> Result<(), ResearchError> {
    let len = question.chars().count();
    if len < MIN_QUESTION_CHARS {
        return Err(ResearchError::InvalidRequest(format!(
            "question must be at least {MIN_QUESTION_CHARS} characters"
        )));
    }
    if len > MAX_QUESTION_CHARS {
        return Err(ResearchError::InvalidRequest(format!(
            "question must be at most {MAX_QUESTION_CHARS} characters"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchRequest {
    pub question: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchResponse {
    pub engine_states: Vec<EngineState>,
    pub report: Report,
}

/// Whether an engine has a credential configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineAvailability {
    pub engine_id: EngineId,
    pub label: String,
    pub configured: bool,
}

pub struct Researcher {
    config: ResearchConfig,
    credentials: Credentials,
    transport: Arc<dyn Transport>,
}

impl Researcher {
    pub fn new(
        config: ResearchConfig,
        credentials: Credentials,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            config,
            credentials,
            transport,
        }
    }

    /// Researcher over the shared reqwest client with credentials read from
    /// the environment.
    #[cfg(feature = "http-client")]
    pub fn from_env(config: ResearchConfig) -> Self {
        Self::new(
            config,
            Credentials::from_env(),
            Arc::new(crate::outbound::ReqwestTransport),
        )
    }

    pub fn engine_availability(&self) -> Vec<EngineAvailability> {
        ENGINE_ORDER
            .iter()
            .map(|&id| EngineAvailability {
                engine_id: id,
                label: id.label().to_string(),
                configured: self.credentials.api_key(id).is_some(),
            })
            .collect()
    }

    /// Call one engine. Never fails: every outcome is folded into the
    /// returned [`EngineResult`].
    #[instrument(name = "engine_call", skip_all, fields(engine = %id))]
    pub async fn query_engine(&self, id: EngineId, prompt: &str) -> EngineResult {
        let Some(api_key) = self.credentials.api_key(id) else {
            debug!("no credential configured");
            return EngineResult::unavailable(id, Credentials::missing_message(id));
        };

        let params = match self.config.params(id) {
            Ok(p) => p,
            Err(e) => return EngineResult::error(id, None, e.engine_message()),
        };
        let engine = build_engine(id, api_key, params);

        let start = Instant::now();
        let outcome = async {
            let req = engine.chat_request(prompt)?;
            let resp = self.transport.send(req, engine.timeout()).await?;
            engine.parse_chat(resp)
        }
        .await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(text) => {
                let claims = extract_claims(&text);
                info!(elapsed_ms, claims = claims.len(), "engine responded");
                EngineResult::ok(id, elapsed_ms, text, claims)
            }
            Err(e) => {
                let message = e.engine_message();
                warn!(elapsed_ms, error = %message, "engine call failed");
                EngineResult::error(id, Some(elapsed_ms), message)
            }
        }
    }

    /// Query every engine concurrently; results come back in [`ENGINE_ORDER`].
    pub async fn query_all(&self, prompt: &str) -> Vec<EngineResult> {
        join_all(ENGINE_ORDER.iter().map(|&id| self.query_engine(id, prompt))).await
    }

    pub async fn run(&self, question: &str) -> Result<ResearchResponse, ResearchError> {
        validate_question(question)?;

        let span = info_span!("research", question_chars = question.chars().count());
        async {
            let subquestions = generate_subquestions(question);
            let prompt = build_prompt(question, &subquestions);
            let results = self.query_all(&prompt).await;
            let report = synthesize(question, &results);
            info!(
                responded = results.iter().filter(|r| r.is_ok()).count(),
                "research complete"
            );
            Ok(ResearchResponse {
                engine_states: results.iter().map(EngineResult::state).collect(),
                report,
            })
        }
        .instrument(span)
        .await
    }
}
