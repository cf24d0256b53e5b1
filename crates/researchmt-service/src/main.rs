use anyhow::Result;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use researchmt::{
    ResearchError, ResearchRequest, Researcher, config::ResearchConfig,
    research::EngineAvailability,
};
use researchmt_utils::{paths::resolve_config, telemetry::setup_telemetry};
use serde::Serialize;
use std::{path::PathBuf, sync::Arc};
use tower_http::cors::CorsLayer;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Address to bind the service to
    #[arg(long, default_value = "0.0.0.0:8080")]
    addr: String,
    /// Path to research config file (defaults to ~/.rmt/research.toml or .json)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Optional auth key required for requests (Bearer token)
    #[arg(long, env = "RMT_AUTH_KEY")]
    auth_key: Option<String>,
}

#[derive(Clone)]
struct ServerState {
    researcher: Arc<Researcher>,
    auth_key: Option<String>,
}

#[derive(Serialize)]
struct EnginesResponse {
    engines: Vec<EngineAvailability>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry = setup_telemetry("researchmt-service", env!("CARGO_PKG_VERSION"))?;

    let args = Args::parse();
    let config_path = resolve_config(args.config.as_deref());

    info!(
        addr = %args.addr,
        config = %config_path.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "defaults".into()),
        auth = %args.auth_key.as_ref().map(|_| "enabled").unwrap_or("disabled"),
        "starting service"
    );

    let config = ResearchConfig::load(config_path.as_deref())?;
    let state = ServerState {
        researcher: Arc::new(Researcher::from_env(config)),
        auth_key: args.auth_key,
    };

    let listener = tokio::net::TcpListener::bind(&args.addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

fn app(state: ServerState) -> Router {
    Router::new()
        .route("/api/research", post(handle_research))
        .route("/api/engines", get(handle_engines))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn authorize(state: &ServerState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let Some(key) = &state.auth_key else {
        return Ok(());
    };

    let auth_header = headers.get("Authorization").ok_or((
        StatusCode::UNAUTHORIZED,
        "Missing authorization".to_string(),
    ))?;

    let auth_str = auth_header.to_str().map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            "Invalid authorization header".to_string(),
        )
    })?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if token == key => Ok(()),
        _ => {
            warn!("unauthorized request");
            Err((StatusCode::UNAUTHORIZED, "Invalid API key".to_string()))
        }
    }
}

async fn handle_research(
    State(state): State<ServerState>,
    headers: HeaderMap,
    payload: Result<Json<ResearchRequest>, JsonRejection>,
) -> Result<Response, (StatusCode, String)> {
    authorize(&state, &headers)?;

    // every malformed body is a client error, whatever axum's own status would be
    let Json(req) = payload.map_err(|e| (StatusCode::BAD_REQUEST, e.body_text()))?;

    let request_id = Uuid::new_v4();
    let response = state
        .researcher
        .run(&req.question)
        .instrument(info_span!("research_request", %request_id))
        .await
        .map_err(|e| match e {
            ResearchError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        })?;

    Ok(Json(response).into_response())
}

async fn handle_engines(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> Result<Json<EnginesResponse>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    Ok(Json(EnginesResponse {
        engines: state.researcher.engine_availability(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use researchmt::{engines::Credentials, outbound::Transport};
    use serde_json::{Value, json};
    use std::time::Duration;
    use tower::ServiceExt;

    /// Every engine answers with the same three bullets.
    struct FixedTransport;

    #[async_trait]
    impl Transport for FixedTransport {
        async fn send(
            &self,
            _req: http::Request<Vec<u8>>,
            _timeout: Duration,
        ) -> Result<http::Response<Vec<u8>>, ResearchError> {
            let body = json!({"choices": [{"message": {"content":
                "- Solar capacity doubled since 2020\n- Storage costs are falling\n- Grid upgrades lag behind"}}]});
            Ok(http::Response::builder()
                .status(200)
                .body(serde_json::to_vec(&body).unwrap())
                .unwrap())
        }
    }

    fn state(credentials: Credentials, auth_key: Option<&str>) -> ServerState {
        ServerState {
            researcher: Arc::new(Researcher::new(
                ResearchConfig::default(),
                credentials,
                Arc::new(FixedTransport),
            )),
            auth_key: auth_key.map(str::to_string),
        }
    }

    fn post_research(body: &str) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .method("POST")
            .uri("/api/research")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(state: ServerState, req: axum::http::Request<Body>) -> (StatusCode, Vec<u8>) {
        let resp = app(state).oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), 1_000_000)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn research_returns_states_and_report() {
        let creds = Credentials::from_pairs([("OPENAI_API_KEY", "a"), ("KIMI_API_KEY", "b")]);
        let (status, body) = send(
            state(creds, None),
            post_research(r#"{"question":"Where is solar energy heading?"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let json: Value = serde_json::from_slice(&body).unwrap();
        let states = json["engineStates"].as_array().unwrap();
        assert_eq!(states.len(), 4);
        assert_eq!(states[0]["status"], "ok");
        assert_eq!(states[1]["status"], "unavailable");
        assert_eq!(states[1]["elapsedMs"], Value::Null);

        let report = &json["report"];
        assert_eq!(report["keyFindingsByTheme"].as_array().unwrap().len(), 3);
        assert!(
            report["executiveSummary"]
                .as_str()
                .unwrap()
                .contains("Consensus themes: Solar capacity doubled since 2020")
        );
        assert_eq!(report["raw"]["gemini"]["status"], "unavailable");
    }

    #[tokio::test]
    async fn short_question_is_bad_request() {
        let (status, body) = send(
            state(Credentials::default(), None),
            post_research(r#"{"question":"abc"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(String::from_utf8(body).unwrap().contains("at least 4"));
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        for body in [r#"{"question":"#, r#"{"query":"hello world"}"#, r#"{"question":42}"#] {
            let (status, _) = send(state(Credentials::default(), None), post_research(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        }
    }

    #[tokio::test]
    async fn missing_content_type_is_bad_request() {
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/api/research")
            .body(Body::from(r#"{"question":"hello world"}"#))
            .unwrap();
        let (status, _) = send(state(Credentials::default(), None), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn auth_key_is_enforced() {
        let (status, _) = send(
            state(Credentials::default(), Some("secret")),
            post_research(r#"{"question":"hello world"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let req = axum::http::Request::builder()
            .uri("/api/engines")
            .header("Authorization", "Bearer secret")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(state(Credentials::default(), Some("secret")), req).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn engines_lists_credential_status() {
        let req = axum::http::Request::builder()
            .uri("/api/engines")
            .body(Body::empty())
            .unwrap();
        let creds = Credentials::from_pairs([("PERPLEXITY_API_KEY", "p")]);
        let (status, body) = send(state(creds, None), req).await;
        assert_eq!(status, StatusCode::OK);

        let json: Value = serde_json::from_slice(&body).unwrap();
        let engines = json["engines"].as_array().unwrap();
        let ids: Vec<_> = engines.iter().map(|e| e["engineId"].clone()).collect();
        assert_eq!(ids, [json!("openai"), json!("perplexity"), json!("kimi"), json!("gemini")]);
        assert_eq!(engines[1]["configured"], true);
        assert_eq!(engines[1]["label"], "Perplexity Deep Research");
        assert_eq!(engines[0]["configured"], false);
    }
}
