//! A collection of newtypes defining type-strong IDs.

id_u64! {
    /// An identifier for an Application.
    ApplicationId;
    /// An identifier for an attachment.
    AttachmentId;
    /// An identifier for a Channel
    ChannelId;
    /// An identifier for a slash command.
    CommandId;
    /// An identifier for a Guild
    GuildId;
    /// An identifier for an interaction.
    InteractionId;
    /// An identifier for a Message
    MessageId;
    /// Used for context menu command targets; either a user or a message.
    TargetId;
    /// An identifier for a User
    UserId;
}

impl TargetId {
    /// Converts this [`TargetId`] to [`MessageId`].
    #[must_use]
    pub fn to_message_id(self) -> MessageId {
        MessageId::new(self.get())
    }
}
