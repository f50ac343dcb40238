//! Models relating to channels and the messages sent in them.

mod attachment;
mod message;

pub use self::attachment::*;
pub use self::message::*;
