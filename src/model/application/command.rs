use serde::{Deserialize, Serialize};

use super::{CommandType, InstallationContext, InteractionContext};
use crate::model::id::{ApplicationId, CommandId};

/// The base command model that belongs to an application, as returned after registration.
///
/// [Discord docs](https://discord.com/developers/docs/interactions/application-commands#application-command-object-application-command-structure).
#[derive(Clone, Debug, Deserialize, Serialize)]
#[non_exhaustive]
pub struct Command {
    /// The command Id.
    pub id: CommandId,
    /// The application command kind.
    #[serde(rename = "type", default)]
    pub kind: CommandType,
    /// The parent application Id.
    pub application_id: ApplicationId,
    /// The command name.
    pub name: String,
    /// The command description. Empty for context menu commands.
    #[serde(default)]
    pub description: String,
    /// Installation contexts where the command is available.
    #[serde(default)]
    pub integration_types: Option<Vec<InstallationContext>>,
    /// Interaction contexts where the command can be used.
    #[serde(default)]
    pub contexts: Option<Vec<InteractionContext>>,
}
