use serde::{Deserialize, Serialize};

use super::Attachment;
use crate::model::id::{ChannelId, MessageId};
use crate::model::user::User;

/// A representation of a message over a guild's text channel, a group, or a private channel.
///
/// Only the fields a message context-menu command reads are mapped.
///
/// [Discord docs](https://discord.com/developers/docs/resources/channel#message-object).
#[derive(Clone, Debug, Deserialize, Serialize)]
#[non_exhaustive]
pub struct Message {
    /// The unique Id of the message. Can be used to calculate the creation date of the message.
    pub id: MessageId,
    /// The Id of the [`Channel`] that the message was sent to.
    ///
    /// [`Channel`]: https://discord.com/developers/docs/resources/channel#channel-object
    pub channel_id: ChannelId,
    /// The user that sent the message.
    #[serde(default)]
    pub author: User,
    /// The content of the message.
    #[serde(default)]
    pub content: String,
    /// An vector of the files attached to a message.
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}
