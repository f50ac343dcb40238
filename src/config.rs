//! Deployment settings, read from flags or the environment.

use std::collections::HashSet;
use std::convert::Infallible;
use std::net::SocketAddr;

use clap::Args;
use tracing::warn;

use crate::constants::DEFAULT_MODEL;
use crate::framework::Configuration;
use crate::internal::prelude::*;
use crate::model::id::{ApplicationId, UserId};

fn secret(value: &str) -> StdResult<SecretString, Infallible> {
    Ok(SecretString::new(value.to_owned()))
}

/// Everything a deployment is configured with.
///
/// Every value may come from a flag or from the environment variable named next to it. Secrets
/// never appear in `Debug` output.
#[derive(Args, Clone, Debug)]
pub struct Config {
    /// The application's Ed25519 public key, hex encoded.
    #[arg(long, env = "DISCORD_PUBLIC_KEY", value_parser = secret)]
    pub public_key: Option<SecretString>,

    /// The API key sent to Gemini.
    #[arg(long, env = "GEMINI_API_KEY", value_parser = secret)]
    pub gemini_api_key: Option<SecretString>,

    /// The Discord application Id, shown by `ping` and needed by `register`.
    #[arg(long, env = "DISCORD_APPLICATION_ID")]
    pub application_id: Option<ApplicationId>,

    /// Comma-separated Ids of the users allowed to run owner-only commands.
    #[arg(long, env = "OWNER_IDS")]
    pub owner_ids: Option<String>,

    /// The bot token, only needed by `register`.
    #[arg(long, env = "DISCORD_TOKEN", value_parser = secret)]
    pub discord_token: Option<SecretString>,

    /// Where the interactions endpoint listens.
    #[arg(long, env = "GEMBOT_BIND", default_value = "0.0.0.0:8787")]
    pub bind: SocketAddr,

    /// The model used when a command is invoked without a `model` option.
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,
}

impl Config {
    /// The owner allow-list. Entries are trimmed, empty ones are dropped, and anything that is
    /// not a valid Id is skipped with a warning.
    #[must_use]
    pub fn owners(&self) -> HashSet<UserId> {
        self.owner_ids.as_deref().map_or_else(HashSet::new, parse_owners)
    }

    /// The framework configuration for this deployment.
    pub fn framework(&self) -> Configuration {
        Configuration::new()
            .owners(self.owners())
            .default_model(self.model.clone())
            .application_id(self.application_id)
    }

    /// The public key, if one is configured and non-empty.
    #[must_use]
    pub fn public_key(&self) -> Option<&str> {
        non_empty(self.public_key.as_ref())
    }

    /// Returns the bot token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfig`] if no token is configured.
    pub fn token(&self) -> Result<&str> {
        non_empty(self.discord_token.as_ref()).ok_or(Error::MissingConfig("DISCORD_TOKEN"))
    }

    /// Returns the application Id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfig`] if no application Id is configured.
    pub fn require_application_id(&self) -> Result<ApplicationId> {
        self.application_id.ok_or(Error::MissingConfig("DISCORD_APPLICATION_ID"))
    }
}

fn non_empty(secret: Option<&SecretString>) -> Option<&str> {
    secret.map(|s| s.expose_secret().as_str()).filter(|s| !s.trim().is_empty())
}

fn parse_owners(raw: &str) -> HashSet<UserId> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .filter_map(|id| match id.parse() {
            Ok(user_id) => Some(user_id),
            Err(why) => {
                warn!(id, %why, "ignoring malformed owner id");
                None
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        config: Config,
    }

    fn parse(args: &[&str]) -> Config {
        Cli::try_parse_from(std::iter::once("gembot").chain(args.iter().copied())).unwrap().config
    }

    #[test]
    fn owners_are_trimmed_and_filtered() {
        let owners = parse_owners(" 1, 2,,3 ,nope, ");
        let expected: HashSet<UserId> = [1, 2, 3].into_iter().map(UserId::new).collect();
        assert_eq!(owners, expected);
    }

    #[test]
    fn no_owners_by_default() {
        assert!(parse_owners("").is_empty());
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "--public-key",
            "abcd",
            "--owner-ids",
            "5,6",
            "--model",
            "gemini-3-pro-preview",
            "--bind",
            "127.0.0.1:9000",
        ]);

        assert_eq!(config.public_key(), Some("abcd"));
        assert_eq!(config.bind, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());

        let framework = config.framework();
        assert_eq!(framework.default_model, "gemini-3-pro-preview");
        assert!(framework.is_owner(UserId::new(6)));
    }

    #[test]
    fn secrets_are_redacted() {
        let config = parse(&["--gemini-api-key", "hunter2", "--discord-token", "tok"]);
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("tok\""));
        assert_eq!(config.token().unwrap(), "tok");
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let config = parse(&["--public-key", "  "]);
        assert_eq!(config.public_key(), None);
    }
}
