use tracing::{debug, info};

use super::{everywhere, model_option};
use crate::builder::{CreateCommand, CreateCommandOption};
use crate::constants::MAX_ATTACHMENT_SIZE;
use crate::deferred::{CommandReply, CommandTask, StatusUpdater};
use crate::framework::Context;
use crate::gemini::GenerateRequest;
use crate::internal::prelude::*;
use crate::model::application::{
    CommandInteraction,
    CommandOptionType,
    CommandType,
    ResolvedTarget,
    ResolvedValue,
};
use crate::model::channel::Attachment;

const DESCRIBE_PROMPT: &str = "Describe this image in detail for a blind user, focusing on the \
                               key objects, colors, and the overall scene.";

const OCR_PROMPT: &str = "Transcribe all of the text visible in this image. Preserve the \
                          original line breaks and layout as closely as possible. If there is no \
                          text in the image, reply that no text was found.";

pub(crate) const DOWNLOADING_STATUS: &str = "\u{1f4e5} **Downloading image...**";
pub(crate) const ANALYZING_STATUS: &str = "\u{1f9e0} **Analyzing with Gemini...**";

pub(crate) const TOO_LARGE: &str = "\u{274c} Error: Image is too large (max 5MB).";

/// The two kinds of image analysis a command can ask for.
#[derive(Clone, Copy, Debug)]
enum Analysis {
    Describe,
    Transcribe,
}

impl Analysis {
    fn prompt(self) -> &'static str {
        match self {
            Self::Describe => DESCRIBE_PROMPT,
            Self::Transcribe => OCR_PROMPT,
        }
    }

    fn header(self, model: &str) -> String {
        match self {
            Self::Describe => format!("**Image Description ({model}):**"),
            Self::Transcribe => format!("**Extracted Text ({model}):**"),
        }
    }
}

/// Downloads `attachment`, checks its size and asks Gemini about it.
///
/// A failed download is an error of the command as a whole; everything else ends up in the
/// returned text.
async fn analyze(
    ctx: &Context,
    status: &StatusUpdater,
    attachment: &Attachment,
    model: &str,
    analysis: Analysis,
) -> Result<CommandReply> {
    status.update(DOWNLOADING_STATUS).await;

    let bytes = ctx.attachments.download_attachment(attachment).await.map_err(|why| {
        let reason = match &why {
            Error::Http(http) => http
                .status_code()
                .map_or_else(|| http.to_string(), |code| code.as_u16().to_string()),
            other => other.to_string(),
        };
        Error::Command(format!("Failed to download image from Discord ({reason})"))
    })?;

    if bytes.len() > MAX_ATTACHMENT_SIZE {
        info!(len = bytes.len(), "attachment over the size limit");
        return Ok(CommandReply::from(TOO_LARGE));
    }

    status.update(ANALYZING_STATUS).await;

    debug!(len = bytes.len(), ?analysis, "sending image to gemini");
    let request =
        GenerateRequest::new(analysis.prompt(), model).image(bytes, attachment.mime_type());
    let text = ctx.generator.generate(request).await;

    Ok(CommandReply::Text(format!("{}\n{text}", analysis.header(model))))
}

/// Shared by `describe` and `ocr`, which both read the `image` option.
async fn analyze_option(
    ctx: Context,
    interaction: CommandInteraction,
    status: StatusUpdater,
    analysis: Analysis,
) -> Result<CommandReply> {
    let model = ctx.model_for(&interaction);

    let attachment = match interaction.data.attachment("image") {
        None => return Ok(CommandReply::from("\u{274c} Error: Image attachment not found.")),
        Some(ResolvedValue::Attachment(attachment)) => attachment.clone(),
        Some(_) => {
            return Ok(CommandReply::from("\u{274c} Error: Could not resolve image attachment."))
        },
    };

    analyze(&ctx, &status, &attachment, &model, analysis).await
}

pub fn describe(
    ctx: Context,
    interaction: CommandInteraction,
    status: StatusUpdater,
) -> CommandTask {
    Box::pin(analyze_option(ctx, interaction, status, Analysis::Describe))
}

pub fn describe_definition() -> CreateCommand {
    everywhere(
        CreateCommand::new("describe")
            .description("Describes an attached image using Gemini.")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Attachment,
                    "image",
                    "The image to describe",
                )
                .required(true),
            )
            .add_option(model_option("Specify the model to use")),
    )
}

pub fn ocr(ctx: Context, interaction: CommandInteraction, status: StatusUpdater) -> CommandTask {
    Box::pin(analyze_option(ctx, interaction, status, Analysis::Transcribe))
}

pub fn ocr_definition() -> CreateCommand {
    everywhere(
        CreateCommand::new("ocr")
            .description("Extracts text from an image (Optical Character Recognition).")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Attachment,
                    "image",
                    "The image to read text from",
                )
                .required(true),
            )
            .add_option(model_option("Specify the model to use")),
    )
}

/// The message context menu variant of `describe`: analyzes the first attachment of the message
/// it was invoked on.
pub fn describe_message(
    ctx: Context,
    interaction: CommandInteraction,
    status: StatusUpdater,
) -> CommandTask {
    Box::pin(async move {
        let model = ctx.config.default_model.clone();

        let Some(ResolvedTarget::Message(message)) = interaction.data.target() else {
            return Ok(CommandReply::from(
                "\u{274c} Error: Could not resolve the target message.",
            ));
        };

        let Some(attachment) = message.attachments.first() else {
            return Ok(CommandReply::from("\u{274c} Error: That message has no attachments."));
        };

        if !attachment.is_image() {
            return Ok(CommandReply::from(
                "\u{274c} Error: The first attachment of that message is not an image.",
            ));
        }

        let attachment = attachment.clone();
        analyze(&ctx, &status, &attachment, &model, Analysis::Describe).await
    })
}

pub fn describe_message_definition() -> CreateCommand {
    everywhere(CreateCommand::new("Describe Image").kind(CommandType::Message))
}
