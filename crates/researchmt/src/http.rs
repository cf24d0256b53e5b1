use std::time::Duration;

use http::{Request, Response};

use crate::{engine::EngineId, error::ResearchError};

/// A research engine reachable over HTTP, expressed without doing any I/O.
///
/// Implementations build the outbound request for a prompt and turn the raw
/// response back into the engine's answer text. Executing the request is the
/// job of a [`crate::outbound::Transport`].
pub trait HTTPEngine: Send + Sync {
    fn id(&self) -> EngineId;

    /// Upper bound for a single call to this engine.
    fn timeout(&self) -> Duration;

    fn chat_request(&self, prompt: &str) -> Result<Request<Vec<u8>>, ResearchError>;

    fn parse_chat(&self, resp: Response<Vec<u8>>) -> Result<String, ResearchError>;
}

/// Turn a non-success response into `HTTP <status>: <body>`.
pub fn handle_http_error(resp: &Response<Vec<u8>>) -> Result<(), ResearchError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let body = String::from_utf8_lossy(resp.body());
    Err(ResearchError::HttpError(format!(
        "HTTP {}: {}",
        status.as_u16(),
        body.trim()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_statuses_pass_through() {
        let resp = Response::builder().status(200).body(b"{}".to_vec()).unwrap();
        assert!(handle_http_error(&resp).is_ok());
    }

    #[test]
    fn error_status_keeps_code_and_body() {
        let resp = Response::builder()
            .status(429)
            .body(b" rate limited \n".to_vec())
            .unwrap();
        let err = handle_http_error(&resp).unwrap_err();
        assert_eq!(err.engine_message(), "HTTP 429: rate limited");
    }
}
