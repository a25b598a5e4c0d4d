//! Test utilities for recover-core
//!
//! A mock Gemini server for development and integration tests. It answers
//! `generateContent` with keyword-driven classifications and can be switched
//! into failure modes.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Json, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::ai::heuristic_classification;

/// How the mock server answers `generateContent`
#[derive(Debug, Clone)]
pub enum MockGeminiMode {
    /// Keyword heuristics over the transcript in the prompt
    Heuristic,
    /// Keyword heuristics, answered after a delay
    Slow(Duration),
    /// Always reply with this candidate text
    Fixed(String),
    /// HTTP 500
    ServerError,
    /// 200 with no candidates
    EmptyCandidates,
    /// 200 with a candidate that is not JSON
    Malformed,
}

/// Mock Gemini server
pub struct MockGeminiServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockGeminiServer {
    /// Start a heuristic mock server on an available port
    pub async fn start() -> Self {
        Self::start_with_mode(MockGeminiMode::Heuristic).await
    }

    pub async fn start_with_mode(mode: MockGeminiMode) -> Self {
        let app = Router::new()
            .route("/v1beta/models/:model", get(handle_model).post(handle_generate))
            .with_state(Arc::new(mode));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Base URL to pass as the Gemini host
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockGeminiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn has_key(headers: &HeaderMap) -> bool {
    headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| !v.is_empty())
}

fn forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({"error": {"code": 403, "message": "API key not valid"}})),
    )
        .into_response()
}

/// Model metadata (used as a health check)
async fn handle_model(headers: HeaderMap, Path(model): Path<String>) -> Response {
    if !has_key(&headers) {
        return forbidden();
    }
    Json(json!({"name": format!("models/{}", model)})).into_response()
}

/// `POST /v1beta/models/{model}:generateContent`
async fn handle_generate(
    State(mode): State<Arc<MockGeminiMode>>,
    headers: HeaderMap,
    Path(model): Path<String>,
    Json(request): Json<Value>,
) -> Response {
    if !model.ends_with(":generateContent") {
        return StatusCode::NOT_FOUND.into_response();
    }
    if !has_key(&headers) {
        return forbidden();
    }

    let text = match mode.as_ref() {
        MockGeminiMode::ServerError => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "backend exploded").into_response();
        }
        MockGeminiMode::EmptyCandidates => {
            return Json(json!({"candidates": []})).into_response();
        }
        MockGeminiMode::Malformed => "I am not sure how to classify this.".to_string(),
        MockGeminiMode::Fixed(text) => text.clone(),
        MockGeminiMode::Slow(delay) => {
            tokio::time::sleep(*delay).await;
            heuristic_reply(&request)
        }
        MockGeminiMode::Heuristic => heuristic_reply(&request),
    };

    Json(json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    }))
    .into_response()
}

fn heuristic_reply(request: &Value) -> String {
    let prompt = request["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default();
    let result = heuristic_classification(extract_transcript(prompt));
    serde_json::to_string(&result).unwrap()
}

/// The quoted transcript inside the rendered classification prompt
fn extract_transcript(prompt: &str) -> &str {
    const START: &str = "Transcript: \"";
    const END: &str = "\"\n\nClassify the status";

    let Some(start) = prompt.find(START).map(|i| i + START.len()) else {
        return "";
    };
    match prompt[start..].find(END) {
        Some(end) => &prompt[start..start + end],
        None => "",
    }
}
