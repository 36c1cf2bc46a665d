//! Conversations domain: in-memory chat history and streamed answers

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{Message, MessageRole, StreamEvent};
pub use domain::prompt::build_system_prompt;
pub use domain::relay::relay;

// Re-export repository types
pub use repository::{ConversationHistory, ConversationStore, Turn};

// Re-export API types
pub use api::routes;
pub use api::ChatState;
