use serde::{Deserialize, Serialize};

use crate::model::id::AttachmentId;

/// A file uploaded with a message, or passed to a command through an attachment option.
///
/// [Discord docs](https://discord.com/developers/docs/resources/channel#attachment-object).
#[derive(Clone, Debug, Deserialize, Serialize)]
#[non_exhaustive]
pub struct Attachment {
    /// The unique ID given to this attachment.
    pub id: AttachmentId,
    /// The filename of the file that was uploaded. This is equivalent to what the uploader had
    /// their file named.
    pub filename: String,
    /// The size of the file in bytes, as declared by Discord.
    #[serde(default)]
    pub size: u32,
    /// The URL of the uploaded attachment.
    pub url: String,
    /// The attachment's [media type].
    ///
    /// [media type]: https://en.wikipedia.org/wiki/Media_type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl Attachment {
    /// Whether the declared content type is an image type.
    ///
    /// Only the declared type is consulted; an attachment without one is not an image.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.content_type.as_deref().is_some_and(|kind| kind.starts_with("image/"))
    }

    /// The media type to forward alongside the attachment's bytes.
    ///
    /// Falls back to a guess from the filename when Discord did not declare one.
    #[must_use]
    pub fn mime_type(&self) -> String {
        match &self.content_type {
            Some(kind) => kind.clone(),
            None => mime_guess::from_path(&self.filename).first_or_octet_stream().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::json;

    fn attachment(content_type: Option<&str>, filename: &str) -> Attachment {
        serde_json::from_value(json!({
            "id": "1",
            "filename": filename,
            "size": 10,
            "url": "https://cdn.discordapp.com/attachments/1/2/file",
            "content_type": content_type,
        }))
        .unwrap()
    }

    #[test]
    fn image_detection_uses_declared_type() {
        assert!(attachment(Some("image/png"), "a.png").is_image());
        assert!(!attachment(Some("text/plain"), "a.png").is_image());
        assert!(!attachment(None, "a.png").is_image());
    }

    #[test]
    fn mime_type_falls_back_to_filename() {
        assert_eq!(attachment(Some("image/webp"), "a.png").mime_type(), "image/webp");
        assert_eq!(attachment(None, "photo.jpg").mime_type(), "image/jpeg");
        assert_eq!(attachment(None, "blob").mime_type(), "application/octet-stream");
    }
}
