//! Mock LLM Service Implementation
//!
//! Programmable mock for testing chat streaming:
//! - `MockLlmService`: replays scripted replies and records every request
//! - `MockReply`: a streamed body, a connection failure, or an error status
//!
//! With no scripted reply queued, the mock answers with a deterministic echo
//! of the last message so local runs work without an upstream.

use crate::{ChatRequest, ChunkStream, LlmError, LlmService};
use bytes::Bytes;
use futures::StreamExt;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

/// One scripted upstream reply
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// Body chunks delivered in order; an `Err` item simulates a read fault
    Stream(Vec<Result<String, String>>),
    /// The request never reaches the upstream
    ConnectError(String),
    /// The upstream answers with a non-success status
    Status(u16, String),
}

impl MockReply {
    /// A well-formed stream delivering each fragment, then the terminator
    pub fn fragments(fragments: &[&str]) -> Self {
        let mut chunks: Vec<Result<String, String>> = fragments
            .iter()
            .map(|fragment| Ok(content_line(fragment)))
            .collect();
        chunks.push(Ok(done_line()));
        MockReply::Stream(chunks)
    }

    /// Raw chunks delivered verbatim
    pub fn raw<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MockReply::Stream(chunks.into_iter().map(|c| Ok(c.into())).collect())
    }
}

/// Encode one content fragment the way the upstream frames it
pub fn content_line(fragment: &str) -> String {
    let record = serde_json::json!({
        "object": "chat.completion.chunk",
        "choices": [{"index": 0, "delta": {"content": fragment}}]
    });
    format!("data: {}\n\n", record)
}

/// Encode the terminator event
pub fn done_line() -> String {
    "data: [DONE]\n\n".to_string()
}

/// Mock LLM service for testing
#[derive(Debug, Clone, Default)]
pub struct MockLlmService {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockLlmService {
    /// Create a new mock LLM service
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for the next request
    pub fn push_reply(&self, reply: MockReply) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
    }

    /// Return all recorded requests
    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clear queued replies and recorded requests
    pub fn reset(&self) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn echo_reply(request: &ChatRequest) -> MockReply {
        let last_message = request
            .messages
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or("empty");
        MockReply::fragments(&["Mock response to: ", last_message])
    }
}

#[async_trait::async_trait]
impl LlmService for MockLlmService {
    async fn stream_chat(&self, request: ChatRequest) -> Result<ChunkStream, LlmError> {
        tracing::debug!(
            messages = request.messages.len(),
            "Mock LLM service processing streaming request"
        );

        let scripted = self
            .replies
            .lock()
            .map_err(|e| LlmError::Request(format!("replies lock poisoned: {e}")))?
            .pop_front();
        let reply = scripted.unwrap_or_else(|| Self::echo_reply(&request));

        self.requests
            .lock()
            .map_err(|e| LlmError::Request(format!("requests lock poisoned: {e}")))?
            .push(request);

        match reply {
            MockReply::ConnectError(message) => Err(LlmError::Request(message)),
            MockReply::Status(status, body) => Err(LlmError::Response(format!(
                "Mock API returned {}: {}",
                status, body
            ))),
            MockReply::Stream(chunks) => {
                let items = chunks.into_iter().map(|chunk| {
                    chunk
                        .map(Bytes::from)
                        .map_err(|e| LlmError::Request(format!("Stream read failed: {}", e)))
                });
                Ok(futures::stream::iter(items).boxed())
            }
        }
    }

    fn default_model(&self) -> &str {
        "mock-model"
    }
}
