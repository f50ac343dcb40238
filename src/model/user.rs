//! User information-related models.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::id::UserId;

/// Information about a user.
///
/// [Discord docs](https://discord.com/developers/docs/resources/user#user-object).
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[non_exhaustive]
pub struct User {
    /// The unique Id of the user. Can be used to calculate the account's creation date.
    pub id: UserId,
    /// The account's username.
    #[serde(rename = "username", default)]
    pub name: String,
    /// The account's display name, if it is set. For bots this is the application name.
    #[serde(default)]
    pub global_name: Option<String>,
    /// Indicator of whether the user is a bot.
    #[serde(default)]
    pub bot: bool,
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        self.id.hash(hasher);
    }
}

impl User {
    /// Returns the name shown in clients: the global name when set, the username otherwise.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.name)
    }
}

/// Information about a member of a guild, as sent along with a guild interaction.
///
/// [Discord docs](https://discord.com/developers/docs/resources/guild#guild-member-object).
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[non_exhaustive]
pub struct Member {
    /// The user this member represents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    /// The member's nickname, if present.
    #[serde(default)]
    pub nick: Option<String>,
}
