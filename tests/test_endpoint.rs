use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use ed25519_dalek::{Signer, SigningKey};
use gembot::builder::EditInteractionResponse;
use gembot::constants::{SIGNATURE_HEADER, TIMESTAMP_HEADER};
use gembot::deferred::Coordinator;
use gembot::framework::{Configuration, Context, Framework, OWNER_ONLY_MESSAGE};
use gembot::gemini::{Generate, GenerateRequest};
use gembot::http::{AttachmentSource, InteractionResponder};
use gembot::model::channel::Attachment;
use gembot::model::id::{ApplicationId, UserId};
use gembot::server::{self, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

const TIMESTAMP: &str = "1700000000";
const OWNER: u64 = 42;
const STRANGER: u64 = 7;
const FIVE_MIB: usize = 5 * 1024 * 1024;

#[derive(Default)]
struct MockGenerator {
    requests: Mutex<Vec<GenerateRequest>>,
}

#[async_trait]
impl Generate for MockGenerator {
    async fn generate(&self, request: GenerateRequest) -> String {
        self.requests.lock().unwrap().push(request);
        String::from("mock answer")
    }
}

struct MockAttachments {
    size: usize,
}

#[async_trait]
impl AttachmentSource for MockAttachments {
    async fn download_attachment(&self, _: &Attachment) -> gembot::Result<Vec<u8>> {
        Ok(vec![0; self.size])
    }
}

#[derive(Default)]
struct MockResponder {
    edits: Mutex<Vec<(String, Value)>>,
}

#[async_trait]
impl InteractionResponder for MockResponder {
    async fn edit_original_interaction_response(
        &self,
        _: ApplicationId,
        interaction_token: &str,
        edit: &EditInteractionResponse,
    ) -> gembot::Result<()> {
        let body = serde_json::to_value(edit).unwrap();
        self.edits.lock().unwrap().push((interaction_token.to_owned(), body));
        Ok(())
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

struct Harness {
    router: Router,
    coordinator: Coordinator,
    generator: Arc<MockGenerator>,
    responder: Arc<MockResponder>,
    key: SigningKey,
}

impl Harness {
    fn new() -> Self {
        Self::build(true, 3)
    }

    fn with_attachment_size(size: usize) -> Self {
        Self::build(true, size)
    }

    fn without_public_key() -> Self {
        Self::build(false, 3)
    }

    fn build(with_key: bool, attachment_size: usize) -> Self {
        let key = SigningKey::from_bytes(&[9; 32]);
        let generator = Arc::new(MockGenerator::default());
        let responder = Arc::new(MockResponder::default());

        let config = Configuration::new().owners([UserId::new(OWNER)].into_iter().collect());
        let context = Context::new(
            config,
            Arc::clone(&generator) as _,
            Arc::new(MockAttachments {
                size: attachment_size,
            }),
            Arc::clone(&responder) as _,
        );
        let coordinator = Coordinator::new(Arc::clone(&context.responder));

        let public_key = hex(key.verifying_key().as_bytes());
        let state = AppState::new(Framework::new(context), coordinator.clone())
            .public_key(with_key.then_some(public_key.as_str()))
            .gemini_key_loaded(true);

        Self {
            router: server::router(state),
            coordinator,
            generator,
            responder,
            key,
        }
    }

    fn signed(&self, body: &[u8]) -> Request<Body> {
        let mut message = TIMESTAMP.as_bytes().to_vec();
        message.extend_from_slice(body);
        let signature = hex(&self.key.sign(&message).to_bytes());

        Request::builder()
            .method("POST")
            .uri("/")
            .header(SIGNATURE_HEADER, signature)
            .header(TIMESTAMP_HEADER, TIMESTAMP)
            .header("content-type", "application/json")
            .body(Body::from(body.to_vec()))
            .unwrap()
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn post(&self, interaction: &Value) -> (StatusCode, Value) {
        let body = serde_json::to_vec(interaction).unwrap();
        let response = self.send(self.signed(&body)).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    /// Waits for every deferred command and returns the edits they sent.
    async fn finish(&self) -> Vec<Value> {
        self.coordinator.shutdown().await;
        self.responder.edits.lock().unwrap().iter().map(|(_, edit)| edit.clone()).collect()
    }
}

fn command(user: u64, data: Value) -> Value {
    json!({
        "id": "1",
        "application_id": "2",
        "type": 2,
        "token": "interaction-token",
        "version": 1,
        "guild_id": "3",
        "member": {"user": {"id": user.to_string(), "username": "someone"}},
        "data": data,
    })
}

fn describe_command() -> Value {
    command(
        STRANGER,
        json!({
            "id": "4",
            "name": "describe",
            "type": 1,
            "options": [{"name": "image", "type": 11, "value": "99"}],
            "resolved": {"attachments": {"99": {
                "id": "99",
                "filename": "cat.png",
                "size": 3,
                "url": "https://cdn.discordapp.com/cat.png",
                "content_type": "image/png",
            }}},
        }),
    )
}

#[tokio::test]
async fn ping_is_answered_with_pong() {
    let harness = Harness::new();
    let ping = json!({"id": "1", "application_id": "2", "type": 1, "token": "t", "version": 1});

    let (status, body) = harness.post(&ping).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"type": 1}));
}

#[tokio::test]
async fn tampered_body_is_rejected() {
    let harness = Harness::new();
    let mut request = harness.signed(br#"{"type":1}"#);
    *request.body_mut() = Body::from(r#"{"type":2}"#);

    let response = harness.send(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_signature_headers_are_rejected() {
    let harness = Harness::new();
    let request =
        Request::builder().method("POST").uri("/").body(Body::from(r#"{"type":1}"#)).unwrap();

    let response = harness.send(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn everything_is_rejected_without_a_public_key() {
    let harness = Harness::without_public_key();
    let request =
        harness.signed(br#"{"id":"1","application_id":"2","type":1,"token":"t","version":1}"#);

    let response = harness.send(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn undecodable_body_is_a_bad_request() {
    let harness = Harness::new();
    let response = harness.send(harness.signed(b"not json")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_command_is_a_bad_request() {
    let harness = Harness::new();
    let (status, body) =
        harness.post(&command(STRANGER, json!({"id": "4", "name": "Ping", "type": 1}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Unknown Command or Interaction"}));
}

#[tokio::test]
async fn liveness_and_not_found() {
    let harness = Harness::new();

    let response = harness.send(Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("Public key: Loaded"));
    assert!(!text.contains(&hex(harness.key.verifying_key().as_bytes())));

    let response = harness.send(Request::get("/elsewhere").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"Not Found.");
}

#[tokio::test]
async fn ping_command_replies_with_an_ephemeral_embed() {
    let harness = Harness::new();
    let (status, body) =
        harness.post(&command(STRANGER, json!({"id": "4", "name": "ping", "type": 1}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], 4);
    assert_eq!(body["data"]["flags"], 64);
    assert_eq!(body["data"]["embeds"][0]["title"], "Pong! \u{1f3d3}");
    assert!(harness.finish().await.is_empty());
}

#[tokio::test]
async fn deferred_command_edits_the_original_once() {
    let harness = Harness::new();
    let data = json!({
        "id": "4",
        "name": "gemini",
        "type": 1,
        "options": [{"name": "prompt", "type": 3, "value": "hi"}],
    });

    let (status, body) = harness.post(&command(STRANGER, data)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"type": 5, "data": {"flags": 64}}));

    let edits = harness.finish().await;
    assert_eq!(edits, vec![json!({
        "content": "**Prompt:** hi\n\n**Gemini (gemini-3-flash-preview):** mock answer"
    })]);
    assert_eq!(harness.responder.edits.lock().unwrap()[0].0, "interaction-token");
}

#[tokio::test]
async fn owner_commands_reject_strangers_without_spawning() {
    let harness = Harness::new();

    for (name, option) in [("say", "message"), ("esay", "embed_json")] {
        let data = json!({
            "id": "4",
            "name": name,
            "type": 1,
            "options": [{"name": option, "type": 3, "value": "{}"}],
        });
        let (status, body) = harness.post(&command(STRANGER, data)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], 4);
        assert_eq!(body["data"]["content"], OWNER_ONLY_MESSAGE);
        assert_eq!(body["data"]["flags"], 64);
    }

    assert_eq!(harness.coordinator.in_flight(), 0);
    assert!(harness.finish().await.is_empty());
}

#[tokio::test]
async fn owner_can_say() {
    let harness = Harness::new();
    let data = json!({
        "id": "4",
        "name": "say",
        "type": 1,
        "options": [{"name": "message", "type": 3, "value": "hello"}],
    });

    let (_, body) = harness.post(&command(OWNER, data)).await;
    assert_eq!(body, json!({"type": 4, "data": {"content": "hello"}}));
}

#[tokio::test]
async fn owner_can_esay() {
    let harness = Harness::new();
    let data = json!({
        "id": "4",
        "name": "esay",
        "type": 1,
        "options": [{"name": "embed_json", "type": 3, "value": r#"{"title":"x"}"#}],
    });

    let (_, body) = harness.post(&command(OWNER, data)).await;
    assert_eq!(body["type"], 5);
    assert_eq!(harness.finish().await, vec![json!({"content": "", "embeds": [{"title": "x"}]})]);
}

#[tokio::test]
async fn attachment_of_exactly_five_mib_is_analyzed() {
    let harness = Harness::with_attachment_size(FIVE_MIB);
    harness.post(&describe_command()).await;

    let edits = harness.finish().await;
    let last = edits.last().unwrap();
    assert_eq!(
        last["content"],
        "**Image Description (gemini-3-flash-preview):**\nmock answer"
    );

    let requests = harness.generator.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let image = requests[0].image.as_ref().unwrap();
    assert_eq!(image.bytes.len(), FIVE_MIB);
    assert_eq!(image.mime_type, "image/png");
}

#[tokio::test]
async fn oversized_attachment_never_reaches_gemini() {
    let harness = Harness::with_attachment_size(FIVE_MIB + 1);
    harness.post(&describe_command()).await;

    let edits = harness.finish().await;
    assert_eq!(
        edits.last().unwrap()["content"],
        "\u{274c} Error: Image is too large (max 5MB)."
    );
    assert!(harness.generator.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn status_updates_precede_the_result() {
    let harness = Harness::new();
    harness.post(&describe_command()).await;

    let contents: Vec<String> = harness
        .finish()
        .await
        .into_iter()
        .map(|edit| edit["content"].as_str().unwrap().to_owned())
        .collect();

    assert_eq!(contents.len(), 3);
    assert!(contents[0].contains("Downloading image"));
    assert!(contents[1].contains("Analyzing with Gemini"));
    assert!(contents[2].starts_with("**Image Description"));
}

#[tokio::test]
async fn context_menu_requires_an_image() {
    let harness = Harness::new();
    let data = json!({
        "id": "4",
        "name": "Describe Image",
        "type": 3,
        "target_id": "55",
        "resolved": {"messages": {"55": {
            "id": "55",
            "channel_id": "6",
            "content": "",
            "attachments": [{
                "id": "99",
                "filename": "notes.txt",
                "size": 3,
                "url": "https://cdn.discordapp.com/notes.txt",
                "content_type": "text/plain",
            }],
        }}},
    });

    harness.post(&command(STRANGER, data)).await;

    let edits = harness.finish().await;
    assert_eq!(edits.len(), 1);
    assert!(edits[0]["content"].as_str().unwrap().starts_with("\u{274c} Error:"));
    assert!(harness.generator.requests.lock().unwrap().is_empty());
}
