// Conversation domain module
// Chat threads and the messages exchanged in them

#![allow(clippy::module_inception)]

pub mod conversation;
pub mod message;

pub use conversation::Conversation;
pub use message::{Message, MessageRole};
