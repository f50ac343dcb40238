//! Running slow commands after their interaction has been acknowledged.
//!
//! A deferred command ends with exactly one terminal edit of the `@original` response. If that
//! edit fails, or the command itself fails, a single "Bot Error" edit is attempted and its own
//! failure is only logged.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt as _;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info_span, warn, Instrument as _};

use crate::builder::EditInteractionResponse;
use crate::constants::{BOT_ERROR_PREFIX, TRUNCATE_AT, TRUNCATION_MARKER};
use crate::http::InteractionResponder;
use crate::internal::prelude::*;
use crate::model::id::ApplicationId;

/// What a deferred command produces.
#[derive(Clone, Debug)]
pub enum CommandReply {
    /// Plain text, sent as `{content}` after truncation.
    Text(String),
    /// A full message edit, sent as is.
    Payload(EditInteractionResponse),
}

impl CommandReply {
    /// The body of the terminal edit.
    pub fn into_edit(self) -> EditInteractionResponse {
        match self {
            Self::Text(text) => EditInteractionResponse::new().content(truncate(&text)),
            Self::Payload(edit) => edit,
        }
    }
}

impl From<String> for CommandReply {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for CommandReply {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<EditInteractionResponse> for CommandReply {
    fn from(edit: EditInteractionResponse) -> Self {
        Self::Payload(edit)
    }
}

/// The unit of work behind a deferred command.
pub type CommandTask = BoxFuture<'static, Result<CommandReply>>;

/// Cuts text longer than [`TRUNCATE_AT`] characters down to that many, followed by
/// [`TRUNCATION_MARKER`]. Shorter text is returned unchanged.
#[must_use]
pub fn truncate(text: &str) -> String {
    match text.char_indices().nth(TRUNCATE_AT) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &text[..cut]),
        None => text.to_owned(),
    }
}

/// Sends non-terminal progress messages for one interaction.
///
/// Failures are logged and otherwise ignored; a progress message never aborts its command.
#[derive(Clone)]
pub struct StatusUpdater {
    responder: Arc<dyn InteractionResponder>,
    application_id: ApplicationId,
    token: Arc<str>,
}

impl StatusUpdater {
    #[must_use]
    pub fn new(
        responder: Arc<dyn InteractionResponder>,
        application_id: ApplicationId,
        token: &str,
    ) -> Self {
        Self {
            responder,
            application_id,
            token: token.into(),
        }
    }

    pub async fn update(&self, message: &str) {
        let edit = EditInteractionResponse::new().content(message);
        if let Err(why) = self
            .responder
            .edit_original_interaction_response(self.application_id, &self.token, &edit)
            .await
        {
            warn!("status update failed: {why}");
        }
    }
}

/// Awaits `task` and delivers its outcome as the terminal edit of the interaction's original
/// response.
///
/// A panic inside `task` is treated like an error.
pub async fn execute<F>(
    responder: &dyn InteractionResponder,
    application_id: ApplicationId,
    token: &str,
    task: F,
) where
    F: Future<Output = Result<CommandReply>>,
{
    let outcome = match AssertUnwindSafe(task).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(_) => Err(Error::Command(String::from("the command panicked"))),
    };

    let why = match outcome {
        Ok(reply) => {
            let edit = reply.into_edit();
            match responder.edit_original_interaction_response(application_id, token, &edit).await
            {
                Ok(()) => {
                    debug!("delivered deferred reply");
                    return;
                },
                Err(why) => why,
            }
        },
        Err(why) => why,
    };

    error!("deferred command failed: {why}");

    let notice =
        EditInteractionResponse::new().content(truncate(&format!("{BOT_ERROR_PREFIX} {why}")));
    if let Err(fallback) =
        responder.edit_original_interaction_response(application_id, token, &notice).await
    {
        warn!("could not report failure to the user either: {fallback}");
    }
}

/// Spawns deferred commands and keeps track of them until they finish.
#[derive(Clone)]
pub struct Coordinator {
    responder: Arc<dyn InteractionResponder>,
    tracker: TaskTracker,
}

impl Coordinator {
    #[must_use]
    pub fn new(responder: Arc<dyn InteractionResponder>) -> Self {
        Self {
            responder,
            tracker: TaskTracker::new(),
        }
    }

    /// The responder terminal edits go through.
    #[must_use]
    pub fn responder(&self) -> &Arc<dyn InteractionResponder> {
        &self.responder
    }

    /// A progress reporter for one interaction.
    #[must_use]
    pub fn status_updater(&self, application_id: ApplicationId, token: &str) -> StatusUpdater {
        StatusUpdater::new(Arc::clone(&self.responder), application_id, token)
    }

    /// Runs `task` in the background; see [`execute`].
    pub fn spawn(
        &self,
        command: &str,
        application_id: ApplicationId,
        token: String,
        task: CommandTask,
    ) {
        let responder = Arc::clone(&self.responder);
        let span = info_span!("deferred", command);

        self.tracker.spawn(
            async move { execute(responder.as_ref(), application_id, &token, task).await }
                .instrument(span),
        );
    }

    /// Number of deferred commands still running.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Closes the tracker and waits for every spawned command to finish.
    pub async fn shutdown(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}
