use tracing::debug;

use super::{everywhere, model_option};
use crate::builder::{
    CreateCommand,
    CreateCommandOption,
    CreateEmbed,
    CreateEmbedFooter,
    CreateInteractionResponse,
    CreateInteractionResponseMessage,
    EditInteractionResponse,
};
use crate::deferred::{CommandReply, CommandTask, StatusUpdater};
use crate::framework::{Context, RequestInfo};
use crate::gemini::GenerateRequest;
use crate::model::application::{CommandInteraction, CommandOptionType};

const UNKNOWN: &str = "unknown";

const TEST_PROMPT: &str = "Test check. Is the API working?";

fn code(value: impl std::fmt::Display) -> String {
    format!("`{value}`")
}

pub fn ping(
    ctx: &Context,
    _: &CommandInteraction,
    info: &RequestInfo,
) -> CreateInteractionResponse {
    let latency = info.latency_ms().map_or_else(|| code(UNKNOWN), |ms| code(format!("{ms}ms")));
    let application_id = ctx.config.application_id.map_or_else(|| code(UNKNOWN), code);
    let field = |value: &Option<String>| code(value.as_deref().unwrap_or(UNKNOWN));

    debug!(?latency, "pong");

    let embed = CreateEmbed::new()
        .title("Pong! \u{1f3d3}")
        .colour(0x5865f2)
        .field("Latency", latency, true)
        .field("Application ID", application_id, true)
        .field("Edge", field(&info.edge), true)
        .field("Country", field(&info.country), true)
        .field("Protocol", field(&info.protocol), true)
        .footer(CreateEmbedFooter::new(concat!(
            "gembot v",
            env!("CARGO_PKG_VERSION"),
            " is active"
        )));

    CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new().embed(embed).ephemeral(true),
    )
}

pub fn ping_definition() -> CreateCommand {
    everywhere(CreateCommand::new("ping").description("Replies with Pong! and checks status."))
}

pub fn test(ctx: Context, interaction: CommandInteraction, _: StatusUpdater) -> CommandTask {
    Box::pin(async move {
        let model = ctx.model_for(&interaction);
        let text = ctx.generator.generate(GenerateRequest::new(TEST_PROMPT, &model)).await;
        Ok(CommandReply::Text(format!("**Test Result ({model}):**\n{text}")))
    })
}

pub fn test_definition() -> CreateCommand {
    everywhere(
        CreateCommand::new("test")
            .description("Tests connection to Gemini API.")
            .add_option(model_option("Specify the model to test")),
    )
}

pub fn gemini(ctx: Context, interaction: CommandInteraction, _: StatusUpdater) -> CommandTask {
    Box::pin(async move {
        let Some(prompt) = interaction.data.str_option("prompt").map(ToOwned::to_owned) else {
            return Ok(CommandReply::from("\u{274c} Error: No prompt was provided."));
        };

        let model = ctx.model_for(&interaction);
        let text = ctx.generator.generate(GenerateRequest::new(prompt.as_str(), &model)).await;
        Ok(CommandReply::Text(format!("**Prompt:** {prompt}\n\n**Gemini ({model}):** {text}")))
    })
}

pub fn gemini_definition() -> CreateCommand {
    everywhere(
        CreateCommand::new("gemini")
            .description("Ask Gemini a question")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "prompt",
                    "The prompt to send to Gemini",
                )
                .required(true),
            )
            .add_option(model_option("Specify the model to use")),
    )
}

pub fn testembed(_: Context, _: CommandInteraction, _: StatusUpdater) -> CommandTask {
    Box::pin(async {
        let embed = CreateEmbed::new()
            .title("Success \u{2705}")
            .description("If you can see this, the bot's embed system is working perfectly.")
            .colour(0x00ff00);

        Ok(EditInteractionResponse::new().content("This is a test embed!").embed(embed).into())
    })
}

pub fn testembed_definition() -> CreateCommand {
    CreateCommand::new("testembed").description("Debug: Sends a hard-coded test embed.")
}
