//! The commands this bot answers to, and their registration payloads.

mod general;
mod owner;
mod vision;

pub use self::owner::parse_embed_json;
use super::{Command, CommandOptions, Handler};
use crate::builder::{CreateCommand, CreateCommandOption};
use crate::model::application::{CommandOptionType, InstallationContext, InteractionContext};

/// Every command known to the framework, in registration order.
pub static COMMANDS: &[Command] = &[
    Command {
        options: CommandOptions {
            name: "ping",
            owners_only: false,
        },
        handler: Handler::Immediate(general::ping),
        definition: general::ping_definition,
    },
    Command {
        options: CommandOptions {
            name: "test",
            owners_only: false,
        },
        handler: Handler::Deferred(general::test),
        definition: general::test_definition,
    },
    Command {
        options: CommandOptions {
            name: "gemini",
            owners_only: false,
        },
        handler: Handler::Deferred(general::gemini),
        definition: general::gemini_definition,
    },
    Command {
        options: CommandOptions {
            name: "describe",
            owners_only: false,
        },
        handler: Handler::Deferred(vision::describe),
        definition: vision::describe_definition,
    },
    Command {
        options: CommandOptions {
            name: "ocr",
            owners_only: false,
        },
        handler: Handler::Deferred(vision::ocr),
        definition: vision::ocr_definition,
    },
    Command {
        options: CommandOptions {
            name: "Describe Image",
            owners_only: false,
        },
        handler: Handler::Deferred(vision::describe_message),
        definition: vision::describe_message_definition,
    },
    Command {
        options: CommandOptions {
            name: "say",
            owners_only: true,
        },
        handler: Handler::Immediate(owner::say),
        definition: owner::say_definition,
    },
    Command {
        options: CommandOptions {
            name: "esay",
            owners_only: true,
        },
        handler: Handler::Deferred(owner::esay),
        definition: owner::esay_definition,
    },
    Command {
        options: CommandOptions {
            name: "testembed",
            owners_only: false,
        },
        handler: Handler::Deferred(general::testembed),
        definition: general::testembed_definition,
    },
];

/// The payload `gembot register` sends to Discord.
#[must_use]
pub fn definitions() -> Vec<CreateCommand> {
    COMMANDS.iter().map(|command| (command.definition)()).collect()
}

/// Available both in guilds and as a user-installed app, in every kind of channel.
fn everywhere(command: CreateCommand) -> CreateCommand {
    command
        .integration_types(vec![InstallationContext::Guild, InstallationContext::User])
        .contexts(vec![
            InteractionContext::Guild,
            InteractionContext::BotDm,
            InteractionContext::PrivateChannel,
        ])
}

fn model_option(description: &str) -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::String, "model", description)
        .add_string_choice("Gemini 3 Flash (Preview)", "gemini-3-flash-preview")
        .add_string_choice("Gemini 3 Pro (Preview)", "gemini-3-pro-preview")
}
