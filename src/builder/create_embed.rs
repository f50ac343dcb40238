//! Developer note:
//!
//! This is a set of embed builders for rich embeds.
//!
//! These are used in the [`CreateInteractionResponseMessage::embed`] and
//! [`EditInteractionResponse::embed`] methods, both as part of builders.
//!
//! Documentation for embeds can be found [here].
//!
//! [`CreateInteractionResponseMessage::embed`]: super::CreateInteractionResponseMessage::embed
//! [`EditInteractionResponse::embed`]: super::EditInteractionResponse::embed
//! [here]: https://discord.com/developers/docs/resources/channel#embed-object

use serde::Serialize;

/// A builder to create an embed in a message
///
/// [Discord docs](https://discord.com/developers/docs/resources/channel#embed-object)
#[derive(Clone, Debug, Default, Serialize)]
#[must_use]
pub struct CreateEmbed {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(rename = "color")]
    #[serde(skip_serializing_if = "Option::is_none")]
    colour: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    footer: Option<CreateEmbedFooter>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    fields: Vec<CreateEmbedField>,
}

impl CreateEmbed {
    /// Equivalent to [`Self::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the colour of the left-hand side of the embed.
    ///
    /// This is an alias of [`Self::colour`].
    pub fn color(self, colour: u32) -> Self {
        self.colour(colour)
    }

    /// Set the colour of the left-hand side of the embed, as a `0xRRGGBB` value.
    pub fn colour(mut self, colour: u32) -> Self {
        self.colour = Some(colour);
        self
    }

    /// Set the description.
    ///
    /// **Note**: This can't be longer than 4096 characters.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set a field. Note that this will not overwrite other fields, and will add to them.
    ///
    /// **Note**: Maximum amount of characters you can put is 256 in a field name and 1024 in a
    /// field value.
    pub fn field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        inline: bool,
    ) -> Self {
        self.fields.push(CreateEmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    /// Set the footer of the embed.
    pub fn footer(mut self, footer: CreateEmbedFooter) -> Self {
        self.footer = Some(footer);
        self
    }

    /// Set the title of the embed.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// A builder to create the footer data for an embed. See [`CreateEmbed::footer`]
#[derive(Clone, Debug, Serialize)]
#[must_use]
pub struct CreateEmbedFooter {
    text: String,
}

impl CreateEmbedFooter {
    /// Creates a new footer object with the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
struct CreateEmbedField {
    name: String,
    value: String,
    inline: bool,
}
