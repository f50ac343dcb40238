use std::collections::HashSet;

use crate::constants::DEFAULT_MODEL;
use crate::model::id::{ApplicationId, UserId};

/// The configuration to use for a [`Framework`].
///
/// # Examples
///
/// Restricting owner-only commands to two users and answering with the pro model by default:
///
/// ```rust
/// use gembot::framework::Configuration;
/// use gembot::model::id::UserId;
///
/// let config = Configuration::new()
///     .owners([UserId::new(7), UserId::new(77)].into_iter().collect())
///     .default_model("gemini-3-pro-preview");
///
/// assert!(config.is_owner(UserId::new(7)));
/// ```
///
/// [`Framework`]: super::Framework
#[derive(Clone, Debug)]
#[must_use]
pub struct Configuration {
    #[doc(hidden)]
    pub owners: HashSet<UserId>,
    #[doc(hidden)]
    pub default_model: String,
    #[doc(hidden)]
    pub application_id: Option<ApplicationId>,
}

impl Configuration {
    /// Equivalent to [`Self::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A set of user Ids that are allowed to use owner-only commands (`say` and `esay`).
    ///
    /// An empty set locks everybody out of them.
    pub fn owners(mut self, user_ids: HashSet<UserId>) -> Self {
        self.owners = user_ids;
        self
    }

    /// The model used when a command is invoked without a `model` option.
    ///
    /// **Note**: Defaults to [`DEFAULT_MODEL`].
    pub fn default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// The application Id configured for this deployment, shown by `ping`.
    pub fn application_id(mut self, application_id: Option<ApplicationId>) -> Self {
        self.application_id = application_id;
        self
    }

    #[must_use]
    pub fn is_owner(&self, user_id: UserId) -> bool {
        self.owners.contains(&user_id)
    }
}

impl Default for Configuration {
    /// Builds a default framework configuration, setting the following:
    ///
    /// - **owners** to an empty HashSet
    /// - **default_model** to [`DEFAULT_MODEL`]
    /// - **application_id** to `None`
    fn default() -> Configuration {
        Configuration {
            owners: HashSet::default(),
            default_model: DEFAULT_MODEL.to_owned(),
            application_id: None,
        }
    }
}
