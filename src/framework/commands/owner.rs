use tracing::debug;

use crate::builder::{
    CreateCommand,
    CreateCommandOption,
    CreateInteractionResponse,
    CreateInteractionResponseMessage,
    EditInteractionResponse,
};
use crate::deferred::{CommandReply, CommandTask, StatusUpdater};
use crate::framework::{Context, RequestInfo};
use crate::internal::prelude::*;
use crate::model::application::{CommandInteraction, CommandOptionType};

pub fn say(
    _: &Context,
    interaction: &CommandInteraction,
    _: &RequestInfo,
) -> CreateInteractionResponse {
    let message = match interaction.data.str_option("message") {
        Some(message) => CreateInteractionResponseMessage::new().content(message),
        None => CreateInteractionResponseMessage::new()
            .content("\u{274c} Error: No message was provided.")
            .ephemeral(true),
    };

    CreateInteractionResponse::Message(message)
}

pub fn say_definition() -> CreateCommand {
    CreateCommand::new("say")
        .description("Bot Owner Only: Makes the bot say a plaintext message.")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "message",
                "The message text to send.",
            )
            .required(true),
        )
}

pub fn esay(_: Context, interaction: CommandInteraction, _: StatusUpdater) -> CommandTask {
    Box::pin(async move {
        let input = interaction.data.str_option("embed_json").unwrap_or_default();
        Ok(parse_embed_json(input))
    })
}

pub fn esay_definition() -> CreateCommand {
    CreateCommand::new("esay")
        .description("Bot Owner Only: Makes the bot send a JSON-formatted embed.")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "embed_json",
                "The JSON string for the Discord embed.",
            )
            .required(true),
        )
}

/// Turns user-supplied JSON into a message edit.
///
/// An object with a truthy `embeds` field (anything but `null`, `false`, `0` or `""`) is taken as
/// a whole message: its `content` is kept if it is a string and the embeds are forwarded as given.
/// Anything else is treated as one embed, or as a list of embeds if it is an array, and sent with
/// empty content.
///
/// Malformed input is not an error of the command; it produces a visible message instead.
#[must_use]
pub fn parse_embed_json(input: &str) -> CommandReply {
    let value: Value = match serde_json::from_str(input) {
        Ok(value) => value,
        Err(why) => {
            debug!(%why, "rejected embed json");
            return CommandReply::Text(format!("\u{274c} **JSON Error:** {why}"));
        },
    };

    let (content, embeds) = match value {
        Value::Object(mut map) if map.get("embeds").is_some_and(is_truthy) => {
            let content = match map.remove("content") {
                Some(Value::String(content)) => content,
                _ => String::new(),
            };
            let embeds = match map.remove("embeds") {
                Some(Value::Array(embeds)) => embeds,
                Some(other) => vec![other],
                None => Vec::new(),
            };
            (content, embeds)
        },
        Value::Array(embeds) => (String::new(), embeds),
        other => (String::new(), vec![other]),
    };

    EditInteractionResponse::new().content(content).raw_embeds(embeds).into()
}

/// Empty arrays and objects count as present.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::json::to_value;

    fn payload(input: &str) -> Value {
        match parse_embed_json(input) {
            CommandReply::Payload(edit) => to_value(edit).unwrap(),
            CommandReply::Text(text) => panic!("expected a payload, got {text:?}"),
        }
    }

    #[test]
    fn full_payload() {
        assert_eq!(
            payload(r#"{"embeds":[{"title":"x"}]}"#),
            json!({"content": "", "embeds": [{"title": "x"}]}),
        );
        assert_eq!(
            payload(r#"{"content":"hi","embeds":[{"title":"x"}]}"#),
            json!({"content": "hi", "embeds": [{"title": "x"}]}),
        );
    }

    #[test]
    fn single_embed() {
        assert_eq!(payload(r#"{"title":"x"}"#), json!({"content": "", "embeds": [{"title": "x"}]}));
    }

    #[test]
    fn embed_list() {
        assert_eq!(
            payload(r#"[{"title":"a"},{"title":"b"}]"#),
            json!({"content": "", "embeds": [{"title": "a"}, {"title": "b"}]}),
        );
    }

    #[test]
    fn falsy_embeds_is_a_single_embed() {
        for embeds in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            let input = json!({"embeds": embeds, "title": "x"});
            assert_eq!(
                payload(&input.to_string()),
                json!({"content": "", "embeds": [input]}),
                "{input}",
            );
        }
    }

    #[test]
    fn truthy_embeds_is_a_full_payload() {
        assert_eq!(
            payload(r#"{"content":"hi","embeds":[]}"#),
            json!({"content": "hi", "embeds": []}),
        );
        assert_eq!(
            payload(r#"{"embeds":{"title":"x"}}"#),
            json!({"content": "", "embeds": [{"title": "x"}]}),
        );
    }

    #[test]
    fn invalid_json() {
        match parse_embed_json("{nope") {
            CommandReply::Text(text) => assert!(text.starts_with("\u{274c} **JSON Error:**")),
            CommandReply::Payload(edit) => panic!("expected an error, got {edit:?}"),
        }
    }
}
