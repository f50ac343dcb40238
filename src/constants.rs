//! A set of constants used by the library.

use std::time::Duration;

/// The base URI of Discord's REST API.
pub const API_BASE: &str = "https://discord.com/api/v10";

/// The base URI of the Gemini generative-language API.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The [UserAgent] sent along with every request.
///
/// [UserAgent]: ::reqwest::header::USER_AGENT
pub const USER_AGENT: &str =
    concat!("DiscordBot (", env!("CARGO_PKG_NAME"), ", ", env!("CARGO_PKG_VERSION"), ")");

/// The maximum unicode code points allowed within a message by Discord.
pub const MESSAGE_CODE_LIMIT: usize = 2000;

/// Terminal plain-text replies longer than this are cut before delivery, leaving room below
/// [`MESSAGE_CODE_LIMIT`] for the truncation marker.
pub const TRUNCATE_AT: usize = 1900;

/// Appended to replies cut at [`TRUNCATE_AT`].
pub const TRUNCATION_MARKER: &str = "\n... *(truncated)*";

/// The largest attachment, in bytes, that is forwarded to Gemini.
pub const MAX_ATTACHMENT_SIZE: usize = 5 * 1024 * 1024;

/// The upper bound on a single Gemini request.
pub const GEMINI_TIMEOUT: Duration = Duration::from_secs(25);

/// The default upper bound on a single request to Discord, including attachment downloads.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// The model used when a command does not name one.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Header carrying the hex-encoded Ed25519 signature of an interaction request.
pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";

/// Header carrying the unix timestamp that was signed along with the body.
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// Prefix of the message delivered when a deferred command fails outright.
pub const BOT_ERROR_PREFIX: &str = "\u{274c} **Bot Error:**";
