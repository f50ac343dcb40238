use serde::Serialize;

use crate::internal::prelude::*;
use crate::model::application::{
    CommandOptionType,
    CommandType,
    InstallationContext,
    InteractionContext,
};

/// A choice offered for a string, integer or number option.
///
/// [Discord docs](https://discord.com/developers/docs/interactions/application-commands#application-command-object-application-command-option-choice-structure).
#[derive(Clone, Debug, Serialize)]
struct CommandOptionChoice {
    name: String,
    value: Value,
}

/// A builder for creating a new command option.
///
/// [`Self::kind`], [`Self::name`], and [`Self::description`] are required fields.
///
/// [Discord docs](https://discord.com/developers/docs/interactions/application-commands#application-command-object-application-command-option-structure).
#[derive(Clone, Debug, Serialize)]
#[must_use]
pub struct CreateCommandOption {
    #[serde(rename = "type")]
    kind: CommandOptionType,
    name: String,
    description: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    choices: Vec<CommandOptionChoice>,
}

impl CreateCommandOption {
    /// Creates a new builder with the given option type, name, and description, leaving all other
    /// fields empty.
    pub fn new(
        kind: CommandOptionType,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            description: description.into(),
            required: false,
            choices: Vec::new(),
        }
    }

    /// Sets the `CommandOptionType`, replacing the current value as set in [`Self::new`].
    pub fn kind(mut self, kind: CommandOptionType) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the description for the option, replacing the current value as set in [`Self::new`].
    ///
    /// **Note**: Must be between 1 and 100 characters.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets if this option is required or optional.
    ///
    /// **Note**: This defaults to `false`.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Adds an optional string-choice.
    ///
    /// **Note**: There can be no more than 25 choices set. Name and value must be between 1 and
    /// 100 characters.
    pub fn add_string_choice(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.choices.push(CommandOptionChoice {
            name: name.into(),
            value: Value::String(value.into()),
        });
        self
    }
}

/// A builder for creating a new application command.
///
/// [`Self::name`] and [`Self::description`] are required fields for chat input commands. Context
/// menu commands carry no description.
///
/// [Discord docs](https://discord.com/developers/docs/interactions/application-commands#create-global-application-command-json-params).
#[derive(Clone, Debug, Serialize)]
#[must_use]
pub struct CreateCommand {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    options: Vec<CreateCommandOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "type")]
    kind: Option<CommandType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    integration_types: Option<Vec<InstallationContext>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contexts: Option<Vec<InteractionContext>>,
}

impl CreateCommand {
    /// Creates a new builder with the given name, leaving all other fields empty.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            kind: None,

            name: name.into(),
            description: None,

            integration_types: None,
            contexts: None,

            options: Vec::new(),
        }
    }

    /// The name the command is registered under.
    #[must_use]
    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Specifies the type of the application command.
    pub fn kind(mut self, kind: CommandType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Specifies the description of the application command.
    ///
    /// **Note**: Must be between 1 and 100 characters long.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an application command option for the application command.
    ///
    /// **Note**: Application commands can have up to 25 options.
    pub fn add_option(mut self, option: CreateCommandOption) -> Self {
        self.options.push(option);
        self
    }

    /// Sets the installation contexts that this application command can be used in.
    pub fn integration_types(mut self, integration_types: Vec<InstallationContext>) -> Self {
        self.integration_types = Some(integration_types);
        self
    }

    /// Sets the interaction contexts that this application command can be used in.
    pub fn contexts(mut self, contexts: Vec<InteractionContext>) -> Self {
        self.contexts = Some(contexts);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::{assert_json, json};

    #[test]
    fn chat_input_command() {
        let command = CreateCommand::new("gemini")
            .description("Ask Gemini a question")
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, "prompt", "The prompt")
                    .required(true),
            )
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, "model", "The model")
                    .add_string_choice("Gemini 3 Flash (Preview)", "gemini-3-flash-preview"),
            )
            .integration_types(vec![InstallationContext::Guild, InstallationContext::User])
            .contexts(vec![InteractionContext::Guild]);

        assert_json(
            &command,
            json!({
                "name": "gemini",
                "description": "Ask Gemini a question",
                "options": [
                    {"type": 3, "name": "prompt", "description": "The prompt", "required": true},
                    {
                        "type": 3,
                        "name": "model",
                        "description": "The model",
                        "choices": [
                            {"name": "Gemini 3 Flash (Preview)", "value": "gemini-3-flash-preview"}
                        ]
                    }
                ],
                "integration_types": [0, 1],
                "contexts": [0],
            }),
        );
    }

    #[test]
    fn context_menu_command() {
        let command = CreateCommand::new("Describe Image").kind(CommandType::Message);
        assert_json(&command, json!({"name": "Describe Image", "type": 3}));
    }
}
