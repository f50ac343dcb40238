use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::{Json, Router};
use gembot::gemini::{GeminiClient, Generate, GenerateRequest};
use secrecy::SecretString;
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Clone)]
struct Upstream {
    status: StatusCode,
    reply: Value,
    seen: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
}

async fn generate_content(
    State(upstream): State<Upstream>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let key = headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()).map(ToOwned::to_owned);
    upstream.seen.lock().unwrap().push((uri.to_string(), key, body));
    (upstream.status, Json(upstream.reply))
}

/// Serves `reply` from a local port and returns a client pointed at it.
async fn upstream(status: StatusCode, reply: Value) -> (GeminiClient, Upstream) {
    let state = Upstream {
        status,
        reply,
        seen: Arc::default(),
    };
    let app = Router::new().fallback(generate_content).with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    (client(&format!("http://{addr}")), state)
}

fn client(base: &str) -> GeminiClient {
    GeminiClient::new(reqwest::Client::new(), Some(SecretString::new(String::from("sekrit"))))
        .with_base(base)
}

#[tokio::test]
async fn answers_with_the_first_candidate() {
    let (client, upstream) = upstream(
        StatusCode::OK,
        json!({"candidates": [{"content": {"parts": [{"text": "a cat"}]}}]}),
    )
    .await;

    let request = GenerateRequest::new("what is this?", "gemini-3-pro-preview")
        .image(vec![0xff, 0xd8], "image/jpeg");
    assert_eq!(client.generate(request).await, "a cat");

    let seen = upstream.seen.lock().unwrap();
    let (uri, key, body) = &seen[0];
    assert_eq!(uri, "/models/gemini-3-pro-preview:generateContent");
    assert_eq!(key.as_deref(), Some("sekrit"));
    assert_eq!(body["contents"][0]["parts"][0]["text"], "what is this?");
    assert_eq!(body["contents"][0]["parts"][1]["inline_data"]["mime_type"], "image/jpeg");
    assert_eq!(body["contents"][0]["parts"][1]["inline_data"]["data"], "/9g=");
}

#[tokio::test]
async fn error_status_carries_the_server_message() {
    let (client, _) = upstream(
        StatusCode::BAD_REQUEST,
        json!({"error": {"code": 400, "message": "API key not valid."}}),
    )
    .await;

    let text = client.generate(GenerateRequest::new("hi", "m")).await;
    assert_eq!(text, "Failed to contact Gemini API: Gemini API 400 (API key not valid.)");
}

#[tokio::test]
async fn safety_block_is_reported() {
    let (client, _) =
        upstream(StatusCode::OK, json!({"promptFeedback": {"blockReason": "SAFETY"}})).await;

    let text = client.generate(GenerateRequest::new("hi", "m")).await;
    assert_eq!(text, "Failed to contact Gemini API: Safety Block: SAFETY");
}

#[tokio::test]
async fn connection_failure_does_not_reveal_the_key() {
    // Bind and drop a listener so the port is known to be closed.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let text = client(&format!("http://{addr}")).generate(GenerateRequest::new("hi", "m")).await;
    assert!(text.starts_with("Failed to contact Gemini API:"), "{text}");
    assert!(!text.contains("sekrit"), "{text}");
}
