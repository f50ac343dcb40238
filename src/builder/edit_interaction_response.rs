use serde::Serialize;

use super::CreateEmbed;
use crate::internal::prelude::*;

/// An embed as it is sent to Discord: either built locally or forwarded verbatim from user input.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
enum EmbedPayload {
    Built(CreateEmbed),
    Raw(Value),
}

/// A builder to specify the fields to edit in an existing interaction response.
///
/// This is the body of every follow-up PATCH to `@original`.
///
/// [Discord docs](https://discord.com/developers/docs/interactions/receiving-and-responding#edit-original-interaction-response).
#[derive(Clone, Debug, Default, Serialize)]
#[must_use]
pub struct EditInteractionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    embeds: Option<Vec<EmbedPayload>>,
}

impl EditInteractionResponse {
    /// Equivalent to [`Self::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the content of the message.
    ///
    /// **Note**: Message contents must be under 2000 unicode code points.
    #[inline]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Adds an embed to the message.
    pub fn embed(mut self, embed: CreateEmbed) -> Self {
        self.embeds.get_or_insert_with(Vec::new).push(EmbedPayload::Built(embed));
        self
    }

    /// Sets the embeds of the message to JSON values that are forwarded without inspection,
    /// replacing any embeds added before.
    pub fn raw_embeds(mut self, embeds: impl IntoIterator<Item = Value>) -> Self {
        self.embeds = Some(embeds.into_iter().map(EmbedPayload::Raw).collect());
        self
    }

    /// The content that will be sent, if any was set.
    #[must_use]
    pub fn get_content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Returns `true` if at least one embed was set.
    #[must_use]
    pub fn has_embeds(&self) -> bool {
        self.embeds.as_ref().is_some_and(|e| !e.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::{assert_json, json};

    #[test]
    fn plain_text_edit() {
        assert_json(&EditInteractionResponse::new().content("done"), json!({"content": "done"}));
    }

    #[test]
    fn mixed_embeds() {
        let edit = EditInteractionResponse::new()
            .content("")
            .raw_embeds([json!({"title": "a"}), json!({"title": "b"})]);
        assert_json(&edit, json!({"content": "", "embeds": [{"title": "a"}, {"title": "b"}]}));

        let edit = EditInteractionResponse::new()
            .content("This is a test embed!")
            .embed(CreateEmbed::new().title("Success").colour(0x00ff00));
        assert_json(
            &edit,
            json!({
                "content": "This is a test embed!",
                "embeds": [{"title": "Success", "color": 0x00ff00}],
            }),
        );
        assert!(edit.has_embeds());
    }
}
