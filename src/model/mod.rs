//! Mappings of objects received from the API, with optional helper methods for ease of use.
//!
//! Only the slice of Discord's object model that reaches an interactions endpoint is mapped:
//! interactions themselves, the users invoking them, and the attachments and messages they
//! resolve.

pub(crate) mod utils;

pub mod application;
pub mod channel;
pub mod id;
pub mod user;

pub mod prelude;
