//! The HTTP surface: a liveness page and the interactions endpoint.
//!
//! | Route      | Behaviour                                                      |
//! |------------|----------------------------------------------------------------|
//! | `GET /`    | Plain-text liveness report.                                    |
//! | `POST /`   | Signed interaction; answered with an interaction response.     |
//! | otherwise  | `404 Not Found.`                                               |

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Version};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use bytes::Bytes;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::constants::{SIGNATURE_HEADER, TIMESTAMP_HEADER};
use crate::deferred::Coordinator;
use crate::framework::{Dispatch, DispatchError, Framework, RequestInfo};
use crate::interactions_endpoint::verify_request;
use crate::json::{self, json};
use crate::model::application::Interaction;

/// Shared by every request.
#[derive(Clone)]
pub struct AppState {
    framework: Framework,
    coordinator: Coordinator,
    public_key: Option<Arc<str>>,
    gemini_key_loaded: bool,
}

impl AppState {
    #[must_use]
    pub fn new(framework: Framework, coordinator: Coordinator) -> Self {
        Self {
            framework,
            coordinator,
            public_key: None,
            gemini_key_loaded: false,
        }
    }

    /// The hex encoded key requests are verified against. Without one, every interaction is
    /// rejected.
    #[must_use]
    pub fn public_key(mut self, public_key: Option<&str>) -> Self {
        self.public_key = public_key.map(Arc::from);
        self
    }

    /// Only reported on the liveness page.
    #[must_use]
    pub fn gemini_key_loaded(mut self, loaded: bool) -> Self {
        self.gemini_key_loaded = loaded;
        self
    }

    #[must_use]
    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }
}

/// Builds the router serving `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(liveness).post(interactions))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn loaded(present: bool) -> &'static str {
    if present {
        "Loaded"
    } else {
        "Missing"
    }
}

async fn liveness(State(state): State<AppState>) -> String {
    format!(
        "\u{2705} gembot is LIVE\n\u{1f511} Public key: {}\n\u{1f511} Gemini key: {}\n\nUse this \
         URL as the Interactions Endpoint URL in the Discord Developer Portal!",
        loaded(state.public_key.is_some()),
        loaded(state.gemini_key_loaded),
    )
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found.")
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn request_info(headers: &HeaderMap, version: Version) -> RequestInfo {
    RequestInfo {
        timestamp: header(headers, TIMESTAMP_HEADER).map(ToOwned::to_owned),
        received_at_ms: chrono::Utc::now().timestamp_millis(),
        // `cf-ray` looks like `8a1b2c3d4e5f6a7b-LHR`; the suffix names the edge location.
        edge: header(headers, "cf-ray")
            .and_then(|ray| ray.rsplit_once('-'))
            .map(|(_, edge)| edge.to_owned()),
        country: header(headers, "cf-ipcountry").map(ToOwned::to_owned),
        protocol: Some(format!("{version:?}")),
    }
}

fn bad_request() -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({"error": "Unknown Command or Interaction"})))
        .into_response()
}

async fn interactions(
    State(state): State<AppState>,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let verified = state.public_key.as_deref().is_some_and(|key| {
        verify_request(
            key,
            header(&headers, SIGNATURE_HEADER),
            header(&headers, TIMESTAMP_HEADER),
            &body,
        )
    });

    if !verified {
        if state.public_key.is_none() {
            warn!("rejecting interaction: no public key is configured");
        }
        return (StatusCode::UNAUTHORIZED, "Invalid request signature").into_response();
    }

    let interaction: Interaction = match json::from_slice(&body) {
        Ok(interaction) => interaction,
        Err(why) => {
            warn!(%why, "undecodable interaction");
            return bad_request();
        },
    };

    let info = request_info(&headers, version);

    match state.framework.dispatch(interaction, &info) {
        Ok(Dispatch::Immediate(response)) => Json(response).into_response(),
        Ok(Dispatch::Deferred {
            response,
            command,
            application_id,
            token,
            task,
        }) => {
            state.coordinator.spawn(command, application_id, token, task);
            Json(response).into_response()
        },
        Err(DispatchError::UnknownCommand(name)) => {
            debug!(name, "unknown command");
            bad_request()
        },
    }
}
