//! The adapter in front of Google's Gemini `generateContent` endpoint.
//!
//! Every outcome of a generation is a displayable string: the answer itself, or a description of
//! what went wrong. Nothing fails past [`Generate::generate`], so command handlers can always
//! deliver *something* to the user.

use std::fmt;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::constants::{GEMINI_API_BASE, GEMINI_TIMEOUT};
use crate::internal::prelude::*;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Returned verbatim when no API key is configured.
pub const MISSING_KEY_MESSAGE: &str = "Error: GEMINI_API_KEY is not configured.";

/// Image bytes sent along with a prompt.
#[derive(Clone, Debug)]
pub struct InlineImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// One generation request.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct GenerateRequest {
    pub prompt: String,
    pub image: Option<InlineImage>,
    pub model: String,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            image: None,
            model: model.into(),
        }
    }

    #[must_use]
    pub fn image(mut self, bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        self.image = Some(InlineImage {
            bytes,
            mime_type: mime_type.into(),
        });
        self
    }
}

/// Something that turns a prompt (and optionally an image) into text.
#[async_trait]
pub trait Generate: Send + Sync {
    /// Always yields a string to show the user, even on failure.
    async fn generate(&self, request: GenerateRequest) -> String;
}

/// Why a single call to Gemini produced no answer.
#[derive(Debug)]
#[non_exhaustive]
pub enum GeminiError {
    /// The request could not be sent, or the response could not be read in time.
    Request(reqwest::Error),
    /// Gemini answered with a non-success status.
    Status { status: StatusCode, message: String },
    /// The prompt was refused by a safety filter.
    SafetyBlock(String),
    /// Gemini answered without any text.
    Empty,
}

impl fmt::Display for GeminiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(inner) if inner.is_timeout() => {
                write!(f, "request timed out after {}s", GEMINI_TIMEOUT.as_secs())
            },
            // The URL may carry credentials, so it is never shown.
            Self::Request(inner) => write!(f, "{}", strip_url(inner)),
            Self::Status {
                status,
                message,
            } => write!(f, "Gemini API {} ({message})", status.as_u16()),
            Self::SafetyBlock(reason) => write!(f, "Safety Block: {reason}"),
            Self::Empty => f.write_str(
                "Gemini returned an empty response (possible safety filter or content blocked).",
            ),
        }
    }
}

impl std::error::Error for GeminiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request(inner) => Some(inner),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GeminiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Request(e.without_url())
    }
}

/// Describes a transport error without the request URL and with the underlying cause, which
/// reqwest keeps in `source()`.
fn strip_url(error: &reqwest::Error) -> String {
    let kind = if error.is_connect() {
        "could not connect"
    } else if error.is_body() || error.is_decode() {
        "could not read the response"
    } else {
        "request failed"
    };

    match std::error::Error::source(error) {
        Some(cause) => format!("{kind}: {cause}"),
        None => kind.to_owned(),
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineDataPayload<'a> },
}

#[derive(Serialize)]
struct InlineDataPayload<'a> {
    mime_type: &'a str,
    data: String,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(request: &'a GenerateRequest) -> Self {
        let mut parts = vec![Part::Text {
            text: &request.prompt,
        }];

        if let Some(image) = &request.image {
            parts.push(Part::InlineData {
                inline_data: InlineDataPayload {
                    mime_type: &image.mime_type,
                    data: BASE64_STANDARD.encode(&image.bytes),
                },
            });
        }

        Self {
            contents: [Content {
                parts,
            }],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Only the first part of the first candidate counts as the answer.
fn extract_text(response: GenerateContentResponse) -> StdResult<String, GeminiError> {
    let first_part = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next());

    if let Some(part) = first_part {
        return part.text.ok_or(GeminiError::Empty);
    }

    match response.prompt_feedback.and_then(|feedback| feedback.block_reason) {
        Some(reason) => Err(GeminiError::SafetyBlock(reason)),
        None => Err(GeminiError::Empty),
    }
}

fn status_error(status: StatusCode, body: &str) -> GeminiError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .and_then(|wrapper| wrapper.error.message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown Error").to_owned());

    GeminiError::Status {
        status,
        message,
    }
}

/// The [`Generate`] implementation backed by the Gemini REST API.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<SecretString>,
    base: String,
}

impl GeminiClient {
    /// Creates a client that sends requests through the given [`reqwest::Client`].
    ///
    /// Without an API key, every generation answers with [`MISSING_KEY_MESSAGE`].
    #[must_use]
    pub fn new(client: Client, api_key: Option<SecretString>) -> Self {
        Self {
            client,
            api_key,
            base: GEMINI_API_BASE.to_owned(),
        }
    }

    /// Sends requests to another base URL instead of Google's.
    #[must_use]
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    #[instrument(skip(self, api_key, request), fields(model = %request.model))]
    async fn try_generate(
        &self,
        api_key: &str,
        request: &GenerateRequest,
    ) -> StdResult<String, GeminiError> {
        let url = format!("{}/models/{}:generateContent", self.base, request.model);

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, api_key)
            .json(&GenerateContentRequest::new(request))
            .timeout(GEMINI_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let parsed = response.json::<GenerateContentResponse>().await?;
        debug!(candidates = parsed.candidates.len(), "gemini responded");
        extract_text(parsed)
    }
}

#[async_trait]
impl Generate for GeminiClient {
    async fn generate(&self, request: GenerateRequest) -> String {
        let Some(api_key) = &self.api_key else {
            return MISSING_KEY_MESSAGE.to_owned();
        };

        match self.try_generate(api_key.expose_secret(), &request).await {
            Ok(text) => text,
            Err(why) => {
                warn!("Gemini request failed: {why}");
                format!("Failed to contact Gemini API: {why}")
            },
        }
    }
}
