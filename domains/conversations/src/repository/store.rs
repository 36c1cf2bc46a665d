//! In-memory conversation store
//!
//! Maps an opaque conversation id to its message history. Each history owns
//! a turn lock so that two chats on the same id run one after the other,
//! while different ids never wait on each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tokio::sync::OwnedMutexGuard;

use crate::domain::entities::Message;

/// Message history of a single conversation
#[derive(Debug, Default)]
pub struct ConversationHistory {
    messages: Mutex<Vec<Message>>,
    turn: Arc<tokio::sync::Mutex<()>>,
}

impl ConversationHistory {
    /// Append a message at the end of the history
    pub fn push(&self, message: Message) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
    }

    /// Snapshot of the history in chronological order
    pub fn messages(&self) -> Vec<Message> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Exclusive right to extend a conversation for one chat turn.
///
/// Holds the history it was opened on. If the conversation is reset while
/// the turn is in flight, messages recorded afterwards land on the detached
/// history and are not visible through the store.
#[derive(Debug)]
pub struct Turn {
    conversation_id: String,
    history: Arc<ConversationHistory>,
    _guard: OwnedMutexGuard<()>,
}

impl Turn {
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub fn record(&self, message: Message) {
        self.history.push(message);
    }

    pub fn messages(&self) -> Vec<Message> {
        self.history.messages()
    }
}

/// Process-wide conversation store
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    conversations: Arc<RwLock<HashMap<String, Arc<ConversationHistory>>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live history for a conversation, created empty if absent
    pub fn open(&self, conversation_id: &str) -> Arc<ConversationHistory> {
        if let Some(history) = self
            .conversations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(conversation_id)
        {
            return Arc::clone(history);
        }

        let mut conversations = self
            .conversations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            conversations
                .entry(conversation_id.to_string())
                .or_default(),
        )
    }

    /// Append a message, creating the conversation if needed
    pub fn append(&self, conversation_id: &str, message: Message) {
        self.open(conversation_id).push(message);
    }

    /// Messages of a conversation in append order; empty if unknown
    pub fn get_history(&self, conversation_id: &str) -> Vec<Message> {
        self.conversations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(conversation_id)
            .map(|history| history.messages())
            .unwrap_or_default()
    }

    /// Drop a conversation entirely. Returns whether it existed.
    pub fn reset(&self, conversation_id: &str) -> bool {
        self.conversations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(conversation_id)
            .is_some()
    }

    /// Wait for exclusive use of a conversation for one chat turn.
    ///
    /// A reset while waiting sends the caller back to the fresh history, so
    /// the turn never starts on a conversation the store no longer holds.
    pub async fn begin_turn(&self, conversation_id: &str) -> Turn {
        loop {
            let history = self.open(conversation_id);
            let guard = Arc::clone(&history.turn).lock_owned().await;

            if self.is_live(conversation_id, &history) {
                return Turn {
                    conversation_id: conversation_id.to_string(),
                    history,
                    _guard: guard,
                };
            }

            tracing::debug!(conversation_id, "Conversation reset while waiting for turn");
        }
    }

    fn is_live(&self, conversation_id: &str, history: &Arc<ConversationHistory>) -> bool {
        self.conversations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(conversation_id)
            .is_some_and(|live| Arc::ptr_eq(live, history))
    }

    /// Number of live conversations
    pub fn len(&self) -> usize {
        self.conversations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
