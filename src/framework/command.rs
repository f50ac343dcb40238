use super::{Context, RequestInfo};
use crate::builder::{CreateCommand, CreateInteractionResponse};
use crate::deferred::{CommandTask, StatusUpdater};
use crate::model::application::CommandInteraction;

/// Answers synchronously, within the request.
pub type ImmediateFn = fn(&Context, &CommandInteraction, &RequestInfo) -> CreateInteractionResponse;

/// Produces the background work of a deferred command.
pub type DeferredFn = fn(Context, CommandInteraction, StatusUpdater) -> CommandTask;

#[derive(Clone, Copy)]
pub enum Handler {
    Immediate(ImmediateFn),
    Deferred(DeferredFn),
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Immediate(_) => "Immediate",
            Self::Deferred(_) => "Deferred",
        })
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CommandOptions {
    /// The name Discord sends in `data.name`. Matched exactly and case-sensitively.
    pub name: &'static str,
    /// Whether command can only be used by owners or not.
    pub owners_only: bool,
}

/// A command the framework can route to, together with its registration payload.
#[derive(Clone, Copy, Debug)]
pub struct Command {
    pub options: CommandOptions,
    pub handler: Handler,
    /// Builds the definition sent to Discord by `gembot register`.
    pub definition: fn() -> CreateCommand,
}
