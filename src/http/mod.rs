//! The HTTP module which provides functions for performing requests to endpoints in Discord's
//! API, plus downloads of attachment bytes from Discord's CDN.
//!
//! Requests come in two kinds:
//!
//! - Interaction webhook requests, which are authorized by the interaction token in the URL;
//! - Application requests, which require the bot token.
//!
//! The former are all this crate needs while serving interactions; the latter only happen when
//! registering commands.
//!
//! The command handlers never talk to [`Http`] directly. They go through the
//! [`InteractionResponder`] and [`AttachmentSource`] traits, which [`Http`] implements.

mod client;
mod error;
mod request;
mod routing;

use async_trait::async_trait;
use reqwest::Method;

pub use self::client::*;
pub use self::error::{ErrorResponse, HttpError};
pub use self::request::Request;
pub use self::routing::Route;
use crate::builder::EditInteractionResponse;
use crate::internal::prelude::*;
use crate::model::channel::Attachment;
use crate::model::id::ApplicationId;

/// The HTTP method of a [`Request`] to Discord's API.
///
/// Kept `Copy` so a request's method can be read again after the request was consumed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LightMethod {
    /// Edits the original interaction response.
    Patch,
    /// Overwrites the global command list.
    Put,
}

impl LightMethod {
    #[must_use]
    pub fn reqwest_method(self) -> Method {
        match self {
            Self::Patch => Method::PATCH,
            Self::Put => Method::PUT,
        }
    }
}

/// Edits the original response of an interaction after it was deferred.
#[async_trait]
pub trait InteractionResponder: Send + Sync {
    /// Sends `PATCH /webhooks/{application_id}/{token}/messages/@original`.
    ///
    /// # Errors
    ///
    /// Returns an [`Error::Http`] if the request fails or Discord answers with a non-success
    /// status.
    async fn edit_original_interaction_response(
        &self,
        application_id: ApplicationId,
        interaction_token: &str,
        edit: &EditInteractionResponse,
    ) -> Result<()>;
}

/// Fetches the bytes behind an [`Attachment`].
#[async_trait]
pub trait AttachmentSource: Send + Sync {
    /// # Errors
    ///
    /// Returns an [`Error::Http`] if the download fails.
    async fn download_attachment(&self, attachment: &Attachment) -> Result<Vec<u8>>;
}
