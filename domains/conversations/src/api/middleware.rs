//! Conversations domain state

use crate::ConversationStore;
use pdfchat_documents::DocumentContext;
use pdfchat_llm::LlmService;
use std::sync::Arc;

/// Application state for the Conversations domain
#[derive(Clone)]
pub struct ChatState {
    pub store: ConversationStore,
    pub context: Arc<DocumentContext>,
    pub llm: Arc<dyn LlmService>,
    /// Model requested upstream; empty defers to the service default
    pub model: String,
    /// Maximum number of history messages forwarded per turn
    pub history_window: Option<usize>,
}
