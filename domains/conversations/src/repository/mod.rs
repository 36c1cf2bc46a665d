//! Repository implementations for Conversations domain
//!
//! Conversations live in memory for the lifetime of the process.

pub mod store;

pub use store::{ConversationHistory, ConversationStore, Turn};
