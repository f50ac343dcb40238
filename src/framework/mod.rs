//! The framework routes verified interactions to the command that handles them.
//!
//! Each command is either *immediate*, answering within the request, or *deferred*, in which
//! case Discord is told to show a loading state and the work continues in the background (see
//! [`crate::deferred`]).
//!
//! Commands are looked up by the exact name Discord sends. Owner-only commands are checked
//! against [`Configuration::owners`] before anything else happens, so a rejected invocation never
//! spawns work.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use gembot::framework::{Configuration, Context, Framework};
//! use gembot::gemini::GeminiClient;
//! use gembot::http::Http;
//!
//! # fn run() -> gembot::Result<()> {
//! let http = Arc::new(Http::new()?);
//! let gemini = Arc::new(GeminiClient::new(http.client().clone(), None));
//! let context = Context::new(Configuration::new(), gemini, http.clone(), http);
//! let framework = Framework::new(context);
//! assert!(framework.find("ping").is_some());
//! # Ok(())
//! # }
//! ```

mod command;
pub mod commands;
mod configuration;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, instrument};

pub use self::command::{Command, CommandOptions, DeferredFn, Handler, ImmediateFn};
pub use self::configuration::Configuration;
use crate::builder::{CreateInteractionResponse, CreateInteractionResponseMessage};
use crate::deferred::{CommandTask, StatusUpdater};
use crate::gemini::Generate;
use crate::http::{AttachmentSource, InteractionResponder};
use crate::internal::prelude::*;
use crate::model::application::{CommandInteraction, Interaction};
use crate::model::id::ApplicationId;

/// Shown to anyone outside the owner list who invokes an owner-only command.
pub const OWNER_ONLY_MESSAGE: &str =
    "\u{274c} Error: This command is restricted to bot owners only.";

/// Everything command handlers may use. Cheap to clone.
#[derive(Clone)]
pub struct Context {
    pub config: Arc<Configuration>,
    pub generator: Arc<dyn Generate>,
    pub attachments: Arc<dyn AttachmentSource>,
    pub responder: Arc<dyn InteractionResponder>,
}

impl Context {
    #[must_use]
    pub fn new(
        config: Configuration,
        generator: Arc<dyn Generate>,
        attachments: Arc<dyn AttachmentSource>,
        responder: Arc<dyn InteractionResponder>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            generator,
            attachments,
            responder,
        }
    }

    /// The `model` option if given, the configured default otherwise.
    #[must_use]
    pub fn model_for(&self, interaction: &CommandInteraction) -> String {
        interaction
            .data
            .str_option("model")
            .filter(|model| !model.is_empty())
            .map_or_else(|| self.config.default_model.clone(), ToOwned::to_owned)
    }
}

/// Transport details of the request that carried an interaction.
///
/// Any of these may be missing; commands fall back to "unknown" for them.
#[derive(Clone, Debug, Default)]
pub struct RequestInfo {
    /// The raw `X-Signature-Timestamp` header, in unix seconds.
    pub timestamp: Option<String>,
    /// When the request was received, in unix milliseconds.
    pub received_at_ms: i64,
    /// The edge location that forwarded the request, if a CDN reported one.
    pub edge: Option<String>,
    /// The country the request came from, if a CDN reported one.
    pub country: Option<String>,
    /// The HTTP version the request used.
    pub protocol: Option<String>,
}

impl RequestInfo {
    /// Milliseconds between the signed timestamp and the moment the request was received.
    #[must_use]
    pub fn latency_ms(&self) -> Option<i64> {
        let seconds: i64 = self.timestamp.as_deref()?.trim().parse().ok()?;
        self.received_at_ms.checked_sub(seconds.checked_mul(1000)?)
    }
}

/// What to do with a verified interaction.
pub enum Dispatch {
    /// Send this response and be done.
    Immediate(CreateInteractionResponse),
    /// Send `response` now, then run `task` and deliver its result as an edit of it.
    Deferred {
        response: CreateInteractionResponse,
        command: &'static str,
        application_id: ApplicationId,
        token: String,
        task: CommandTask,
    },
}

impl fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Immediate(response) => f.debug_tuple("Immediate").field(response).finish(),
            Self::Deferred {
                response,
                command,
                application_id,
                ..
            } => f
                .debug_struct("Deferred")
                .field("response", response)
                .field("command", command)
                .field("application_id", application_id)
                .finish_non_exhaustive(),
        }
    }
}

/// An interaction the framework has no answer for. Answered with `400 Bad Request`.
#[derive(Debug)]
#[non_exhaustive]
pub enum DispatchError {
    UnknownCommand(String),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand(name) => write!(f, "unknown command `{name}`"),
        }
    }
}

impl std::error::Error for DispatchError {}

/// Routes interactions to [`commands::COMMANDS`].
#[derive(Clone)]
pub struct Framework {
    ctx: Context,
    commands: &'static [Command],
}

impl Framework {
    #[must_use]
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            commands: commands::COMMANDS,
        }
    }

    #[must_use]
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    #[must_use]
    pub fn commands(&self) -> &'static [Command] {
        self.commands
    }

    /// Finds a command by its exact name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&'static Command> {
        self.commands.iter().find(|command| command.options.name == name)
    }

    /// Decides how to answer an interaction. Never blocks: deferred work is returned as a task
    /// for the caller to spawn.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownCommand`] if no command has the invoked name.
    #[instrument(skip_all, fields(kind = ?interaction.kind()))]
    pub fn dispatch(
        &self,
        interaction: Interaction,
        info: &RequestInfo,
    ) -> StdResult<Dispatch, DispatchError> {
        match interaction {
            Interaction::Ping(_) => {
                debug!("answering ping");
                Ok(Dispatch::Immediate(CreateInteractionResponse::Pong))
            },
            Interaction::Command(interaction) => self.dispatch_command(interaction, info),
        }
    }

    fn dispatch_command(
        &self,
        interaction: CommandInteraction,
        info: &RequestInfo,
    ) -> StdResult<Dispatch, DispatchError> {
        let Some(command) = self.find(&interaction.data.name) else {
            return Err(DispatchError::UnknownCommand(interaction.data.name));
        };

        let invoker = interaction.invoker_id();
        info!(command = command.options.name, user = %invoker, "command invoked");

        if command.options.owners_only && !self.ctx.config.is_owner(invoker) {
            info!(command = command.options.name, user = %invoker, "rejected non-owner");
            return Ok(Dispatch::Immediate(CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new().content(OWNER_ONLY_MESSAGE).ephemeral(true),
            )));
        }

        Ok(match command.handler {
            Handler::Immediate(handler) => {
                Dispatch::Immediate(handler(&self.ctx, &interaction, info))
            },
            Handler::Deferred(handler) => {
                let application_id = interaction.application_id;
                let token = interaction.token.clone();
                let status = StatusUpdater::new(
                    Arc::clone(&self.ctx.responder),
                    application_id,
                    &token,
                );

                Dispatch::Deferred {
                    response: CreateInteractionResponse::defer_ephemeral(),
                    command: command.options.name,
                    application_id,
                    token,
                    task: handler(self.ctx.clone(), interaction, status),
                }
            },
        })
    }
}
