//! Gembot is a Discord interactions endpoint that answers slash commands with Google's Gemini
//! models.
//!
//! Discord delivers every interaction as a signed HTTP `POST`. The request is checked by the
//! [`interactions_endpoint`] verifier, decoded into an [`Interaction`], and handed to the
//! [`Framework`], which either answers immediately or defers the reply. Deferred commands run in
//! the background through the [`deferred`] coordinator, which edits the original reply once the
//! [`gemini`] call finishes.
//!
//! ```text
//! POST / -> Verifier -> Framework -> immediate reply
//!                                 \-> deferred ack + background task -> PATCH @original
//! ```
//!
//! The [`server`] module wires all of this into an [`axum`] router, and the binary in
//! `src/main.rs` runs it or registers the command list with Discord.
//!
//! [`Interaction`]: crate::model::application::Interaction
//! [`Framework`]: crate::framework::Framework
#![forbid(unsafe_code)]
#![warn(
    unused,
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::clone_on_ref_ptr,
    clippy::non_ascii_literal,
    clippy::fallible_impl_from,
    clippy::let_underscore_must_use,
    clippy::format_push_string,
    clippy::pedantic
)]
#![allow(
    // Allowed as they are too pedantic
    clippy::cast_possible_truncation,
    clippy::module_name_repetitions,
    clippy::unreadable_literal,
    clippy::cast_possible_wrap,
    clippy::wildcard_imports,
    clippy::cast_sign_loss,
    clippy::too_many_lines,
    clippy::doc_markdown,
    clippy::missing_panics_doc,
    clippy::doc_link_with_quotes
)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

#[macro_use]
mod internal;

pub mod builder;
pub mod config;
pub mod constants;
pub mod deferred;
pub mod framework;
pub mod gemini;
pub mod http;
pub mod interactions_endpoint;
pub mod json;
pub mod model;
pub mod server;

mod error;

pub use crate::error::{Error, Result};

/// Special module that re-exports the items most handlers need.
pub mod prelude {
    pub use crate::builder::{
        CreateEmbed,
        CreateInteractionResponse,
        CreateInteractionResponseMessage,
        EditInteractionResponse,
    };
    pub use crate::deferred::{CommandReply, StatusUpdater};
    pub use crate::error::{Error, Result};
    pub use crate::framework::{Context, Dispatch, Framework};
    pub use crate::gemini::{Generate, GenerateRequest, InlineImage};
    pub use crate::http::{AttachmentSource, Http, HttpError, InteractionResponder};
    pub use crate::model::prelude::*;
}
