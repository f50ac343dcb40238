use std::collections::HashMap;

use serde::de::{Deserializer, Error as DeError};
use serde::Deserialize;

use crate::internal::prelude::*;
use crate::model::application::{CommandOptionType, CommandType};
use crate::model::channel::{Attachment, Message};
use crate::model::id::{
    ApplicationId,
    AttachmentId,
    ChannelId,
    CommandId,
    GuildId,
    InteractionId,
    MessageId,
    TargetId,
    UserId,
};
use crate::model::user::{Member, User};

/// An interaction when a user invokes a slash command or a context menu command.
///
/// [Discord docs](https://discord.com/developers/docs/interactions/receiving-and-responding#interaction-object).
#[derive(Clone, Debug, Deserialize)]
#[serde(remote = "Self")]
#[non_exhaustive]
pub struct CommandInteraction {
    /// Id of the interaction.
    pub id: InteractionId,
    /// Id of the application this interaction is for.
    pub application_id: ApplicationId,
    /// The data of the interaction which was triggered.
    pub data: CommandData,
    /// The guild Id this interaction was sent from, if there is one.
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    /// The channel Id this interaction was sent from.
    #[serde(default)]
    pub channel_id: Option<ChannelId>,
    /// The `member` data for the invoking user.
    ///
    /// **Note**: It is only present if the interaction is triggered in a guild.
    #[serde(default)]
    pub member: Option<Box<Member>>,
    /// The `user` object for the invoking user.
    #[serde(default)]
    pub user: User,
    /// A continuation token for responding to the interaction.
    pub token: String,
    /// Always `1`.
    pub version: u8,
    /// The selected language of the invoking user.
    #[serde(default)]
    pub locale: String,
}

impl CommandInteraction {
    /// The Id of the user who invoked the command, wherever it was invoked.
    #[must_use]
    pub fn invoker_id(&self) -> UserId {
        self.user.id
    }
}

// Manual impl needed to insert the guild member's user into the top-level `user` field
impl<'de> Deserialize<'de> for CommandInteraction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> StdResult<Self, D::Error> {
        let mut interaction = Self::deserialize(deserializer)?;
        // If `member` is present, `user` wasn't sent and is still filled with default data
        if let Some(user) = interaction.member.as_ref().and_then(|m| m.user.clone()) {
            interaction.user = user;
        }
        Ok(interaction)
    }
}

/// The command data payload.
///
/// [Discord docs](https://discord.com/developers/docs/interactions/receiving-and-responding#interaction-object-interaction-data-structure).
#[derive(Clone, Debug, Deserialize)]
#[non_exhaustive]
pub struct CommandData {
    /// The Id of the invoked command.
    pub id: CommandId,
    /// The name of the invoked command.
    pub name: String,
    /// The application command type of the triggered application command.
    #[serde(rename = "type", default)]
    pub kind: CommandType,
    /// The parameters and the given values. The converted objects from the given options.
    #[serde(default)]
    pub resolved: CommandDataResolved,
    #[serde(default)]
    pub options: Vec<CommandDataOption>,
    /// The Id of the guild the command is registered to.
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    /// The targeted user or message, if the triggered application command type is [`User`] or
    /// [`Message`].
    ///
    /// Its object data can be found in the [`resolved`] field.
    ///
    /// [`resolved`]: Self::resolved
    /// [`User`]: CommandType::User
    /// [`Message`]: CommandType::Message
    #[serde(default)]
    pub target_id: Option<TargetId>,
}

impl CommandData {
    /// Looks up a top-level option by name.
    #[must_use]
    pub fn option(&self, name: &str) -> Option<&CommandDataOptionValue> {
        self.options.iter().find(|opt| opt.name == name).map(|opt| &opt.value)
    }

    /// Looks up a top-level string option by name.
    #[must_use]
    pub fn str_option(&self, name: &str) -> Option<&str> {
        self.option(name).and_then(CommandDataOptionValue::as_str)
    }

    /// Returns the resolved options from `CommandData::options` and [`CommandData::resolved`].
    #[must_use]
    pub fn options(&self) -> Vec<ResolvedOption<'_>> {
        fn resolve_options<'a>(
            opts: &'a [CommandDataOption],
            resolved: &'a CommandDataResolved,
        ) -> Vec<ResolvedOption<'a>> {
            let mut options = Vec::new();
            for opt in opts {
                let value = match &opt.value {
                    CommandDataOptionValue::SubCommand(opts) => {
                        ResolvedValue::SubCommand(resolve_options(opts, resolved))
                    },
                    CommandDataOptionValue::SubCommandGroup(opts) => {
                        ResolvedValue::SubCommandGroup(resolve_options(opts, resolved))
                    },
                    CommandDataOptionValue::Boolean(v) => ResolvedValue::Boolean(*v),
                    CommandDataOptionValue::Integer(v) => ResolvedValue::Integer(*v),
                    CommandDataOptionValue::Number(v) => ResolvedValue::Number(*v),
                    CommandDataOptionValue::String(v) => ResolvedValue::String(v),
                    CommandDataOptionValue::Attachment(id) => resolved.attachments.get(id).map_or(
                        ResolvedValue::Unresolved(Unresolved::Attachment(*id)),
                        ResolvedValue::Attachment,
                    ),
                    CommandDataOptionValue::Unknown(unknown) => {
                        ResolvedValue::Unresolved(Unresolved::Unknown(*unknown))
                    },
                };

                options.push(ResolvedOption {
                    name: &opt.name,
                    value,
                });
            }
            options
        }

        resolve_options(&self.options, &self.resolved)
    }

    /// Resolves an attachment option by name through [`CommandData::resolved`].
    #[must_use]
    pub fn attachment(&self, name: &str) -> Option<ResolvedValue<'_>> {
        self.options().into_iter().find(|opt| opt.name == name).map(|opt| opt.value)
    }

    /// The target resolved data of [`target_id`]
    ///
    /// [`target_id`]: Self::target_id
    #[must_use]
    pub fn target(&self) -> Option<ResolvedTarget<'_>> {
        match (self.kind, self.target_id) {
            (CommandType::Message, Some(id)) => {
                let message = self.resolved.messages.get(&id.to_message_id())?;

                Some(ResolvedTarget::Message(message))
            },
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct ResolvedOption<'a> {
    pub name: &'a str,
    pub value: ResolvedValue<'a>,
}

/// The resolved value of a [`CommandDataOption`].
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum ResolvedValue<'a> {
    Boolean(bool),
    Integer(i64),
    Number(f64),
    String(&'a str),
    SubCommand(Vec<ResolvedOption<'a>>),
    SubCommandGroup(Vec<ResolvedOption<'a>>),
    Attachment(&'a Attachment),
    Unresolved(Unresolved),
}

/// Option value variants that couldn't be resolved by `CommandData::options()`.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum Unresolved {
    Attachment(AttachmentId),
    /// Variant value for option types that are not resolved here.
    Unknown(u8),
}

/// The resolved value of a [`CommandData::target_id`].
///
/// Only message targets are resolved; a user command has no target here.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum ResolvedTarget<'a> {
    Message(&'a Message),
}

/// The resolved data of a command data interaction payload. It contains the objects of
/// [`CommandDataOption`]s.
///
/// [Discord docs](https://discord.com/developers/docs/interactions/receiving-and-responding#interaction-object-resolved-data-structure).
#[derive(Clone, Debug, Default, Deserialize)]
#[non_exhaustive]
pub struct CommandDataResolved {
    /// The resolved messages.
    #[serde(default)]
    pub messages: HashMap<MessageId, Message>,
    /// The resolved attachments.
    #[serde(default)]
    pub attachments: HashMap<AttachmentId, Attachment>,
}

/// A set of a parameter and a value from the user.
///
/// All options have names and an option can either be a parameter and input `value` or it can
/// denote a sub-command or group, in which case it will contain a top-level key and another vector
/// of `options`.
///
/// Their resolved objects can be found on [`CommandData::resolved`].
///
/// [Discord docs](https://discord.com/developers/docs/interactions/application-commands#application-command-object-application-command-interaction-data-option-structure).
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct CommandDataOption {
    /// The name of the parameter.
    pub name: String,
    /// The given value.
    pub value: CommandDataOptionValue,
}

impl CommandDataOption {
    #[must_use]
    pub fn kind(&self) -> CommandOptionType {
        self.value.kind()
    }
}

#[derive(Deserialize)]
struct RawCommandDataOption {
    name: String,
    #[serde(rename = "type")]
    kind: CommandOptionType,
    value: Option<serde_json::Value>,
    options: Option<Vec<RawCommandDataOption>>,
}

fn option_from_raw<E: DeError>(raw: RawCommandDataOption) -> StdResult<CommandDataOption, E> {
    macro_rules! value {
        () => {
            serde_json::from_value(raw.value.ok_or_else(|| DeError::missing_field("value"))?)
                .map_err(DeError::custom)?
        };
    }

    let value = match raw.kind {
        CommandOptionType::Boolean => CommandDataOptionValue::Boolean(value!()),
        CommandOptionType::Integer => CommandDataOptionValue::Integer(value!()),
        CommandOptionType::Number => CommandDataOptionValue::Number(value!()),
        CommandOptionType::String => CommandDataOptionValue::String(value!()),
        CommandOptionType::SubCommand => {
            let options = raw.options.ok_or_else(|| DeError::missing_field("options"))?;
            let options = options.into_iter().map(option_from_raw).collect::<StdResult<_, E>>()?;
            CommandDataOptionValue::SubCommand(options)
        },
        CommandOptionType::SubCommandGroup => {
            let options = raw.options.ok_or_else(|| DeError::missing_field("options"))?;
            let options = options.into_iter().map(option_from_raw).collect::<StdResult<_, E>>()?;
            CommandDataOptionValue::SubCommandGroup(options)
        },
        CommandOptionType::Attachment => CommandDataOptionValue::Attachment(value!()),
        kind => CommandDataOptionValue::Unknown(kind.into()),
    };

    Ok(CommandDataOption {
        name: raw.name,
        value,
    })
}

// Manual impl needed to emulate integer enum tags
impl<'de> Deserialize<'de> for CommandDataOption {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> StdResult<Self, D::Error> {
        option_from_raw(RawCommandDataOption::deserialize(deserializer)?)
    }
}

/// The value of an [`CommandDataOption`].
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum CommandDataOptionValue {
    Boolean(bool),
    Integer(i64),
    Number(f64),
    String(String),
    SubCommand(Vec<CommandDataOption>),
    SubCommandGroup(Vec<CommandDataOption>),
    Attachment(AttachmentId),
    /// Option types that are decoded but not read, such as users and channels.
    Unknown(u8),
}

impl CommandDataOptionValue {
    #[must_use]
    pub fn kind(&self) -> CommandOptionType {
        match self {
            Self::Boolean(_) => CommandOptionType::Boolean,
            Self::Integer(_) => CommandOptionType::Integer,
            Self::Number(_) => CommandOptionType::Number,
            Self::String(_) => CommandOptionType::String,
            Self::SubCommand(_) => CommandOptionType::SubCommand,
            Self::SubCommandGroup(_) => CommandOptionType::SubCommandGroup,
            Self::Attachment(_) => CommandOptionType::Attachment,
            Self::Unknown(unknown) => CommandOptionType::from(*unknown),
        }
    }

    /// If the value is a string, returns the associated str. Returns None otherwise.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::json;

    #[test]
    fn nested_options() {
        let option: CommandDataOption = serde_json::from_value(json!({
            "name": "subcommand_group",
            "type": 2,
            "options": [{
                "name": "subcommand",
                "type": 1,
                "options": [
                    {"name": "channel", "type": 7, "value": "3"},
                    {"name": "text", "type": 3, "value": "hi"},
                ],
            }]
        }))
        .unwrap();

        let CommandDataOptionValue::SubCommandGroup(group) = &option.value else {
            panic!("expected a group, got {option:?}");
        };
        let CommandDataOptionValue::SubCommand(options) = &group[0].value else {
            panic!("expected a subcommand, got {group:?}");
        };
        assert_eq!(options[0].kind(), CommandOptionType::Channel);
        assert_eq!(options[0].value, CommandDataOptionValue::Unknown(7));
        assert_eq!(options[1].value.as_str(), Some("hi"));
    }

    #[test]
    fn option_without_value_is_rejected() {
        let result =
            serde_json::from_value::<CommandDataOption>(json!({"name": "text", "type": 3}));
        assert!(result.is_err());
    }

    #[test]
    fn member_user_becomes_invoker() {
        let interaction: CommandInteraction = serde_json::from_value(json!({
            "id": "1",
            "application_id": "2",
            "type": 2,
            "token": "tok",
            "version": 1,
            "guild_id": "3",
            "member": {"user": {"id": "42", "username": "owner"}},
            "data": {"id": "4", "name": "say", "type": 1},
        }))
        .unwrap();

        assert_eq!(interaction.invoker_id(), UserId::new(42));
    }

    #[test]
    fn dm_user_is_invoker() {
        let interaction: CommandInteraction = serde_json::from_value(json!({
            "id": "1",
            "application_id": "2",
            "token": "tok",
            "version": 1,
            "user": {"id": "7", "username": "someone"},
            "data": {"id": "4", "name": "say"},
        }))
        .unwrap();

        assert_eq!(interaction.invoker_id(), UserId::new(7));
        assert_eq!(interaction.data.kind, CommandType::ChatInput);
    }

    #[test]
    fn attachment_options_resolve() {
        let data: CommandData = serde_json::from_value(json!({
            "id": "4",
            "name": "describe",
            "type": 1,
            "options": [
                {"name": "image", "type": 11, "value": "99"},
                {"name": "missing", "type": 11, "value": "100"},
                {"name": "model", "type": 3, "value": "gemini-3-pro-preview"},
            ],
            "resolved": {
                "attachments": {
                    "99": {
                        "id": "99",
                        "filename": "cat.png",
                        "size": 3,
                        "url": "https://cdn.discordapp.com/cat.png",
                        "content_type": "image/png",
                    }
                }
            }
        }))
        .unwrap();

        assert!(matches!(
            data.attachment("image"),
            Some(ResolvedValue::Attachment(a)) if a.filename == "cat.png"
        ));
        assert!(matches!(
            data.attachment("missing"),
            Some(ResolvedValue::Unresolved(Unresolved::Attachment(id))) if id.get() == 100
        ));
        assert!(data.attachment("nope").is_none());
        assert_eq!(data.str_option("model"), Some("gemini-3-pro-preview"));
    }

    #[test]
    fn message_target_resolves() {
        let data: CommandData = serde_json::from_value(json!({
            "id": "4",
            "name": "Describe Image",
            "type": 3,
            "target_id": "55",
            "resolved": {
                "messages": {
                    "55": {"id": "55", "channel_id": "6", "content": "look", "attachments": []}
                }
            }
        }))
        .unwrap();

        assert!(matches!(data.target(), Some(ResolvedTarget::Message(m)) if m.content == "look"));
    }
}
