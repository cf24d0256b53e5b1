use thiserror::Error;

/// Error types that can occur while running a research request.
///
/// Per-engine failures never surface through this type to the caller of
/// [`crate::research::Researcher::run`]; they are folded into that engine's
/// [`crate::engine::EngineResult`]. Only request validation and setup errors
/// propagate.
#[derive(Error, Debug)]
pub enum ResearchError {
    /// The inbound request was malformed or out of range.
    #[error("Invalid Request: {0}")]
    InvalidRequest(String),

    /// Transport failures and non-success HTTP statuses.
    #[error("HTTP Error: {0}")]
    HttpError(String),

    /// The engine answered with a body we could not decode.
    #[error("Response Format Error: {message}. Raw response: '{raw_response}'")]
    ResponseFormatError {
        message: String,
        raw_response: String,
    },

    /// Problems with the research configuration file.
    #[error("Config Error: {0}")]
    ConfigError(String),

    #[error("JSON Error")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML Error")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid URL")]
    InvalidUrl(#[from] url::ParseError),

    #[error("I/O Error")]
    IoError(#[from] std::io::Error),
}

#[cfg(feature = "http-client")]
impl From<reqwest::Error> for ResearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ResearchError::HttpError(format!("request timed out: {err}"));
        }
        ResearchError::HttpError(err.to_string())
    }
}

impl From<http::Error> for ResearchError {
    fn from(err: http::Error) -> Self {
        ResearchError::HttpError(err.to_string())
    }
}

impl ResearchError {
    /// Short message suitable for an engine status line.
    ///
    /// HTTP errors already carry `HTTP <status>: <body>` so their payload is
    /// returned without the variant prefix.
    pub fn engine_message(&self) -> String {
        match self {
            ResearchError::HttpError(msg) => msg.clone(),
            ResearchError::ResponseFormatError { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
