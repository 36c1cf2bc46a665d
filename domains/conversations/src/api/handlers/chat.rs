//! Chat API handlers

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, Sse},
    Json,
};
use futures::{Stream, StreamExt};
use pdfchat_common::{Result, ValidatedJson};
use pdfchat_llm::{ChatRequest, LlmMessage};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::ChatState;
use crate::domain::entities::{Message, StreamEvent};
use crate::domain::prompt::build_system_prompt;
use crate::domain::relay::relay;

/// Request for sending a chat message
#[derive(Debug, Deserialize, Validate)]
pub struct ChatMessageRequest {
    pub message: String,

    #[validate(length(min = 1))]
    pub conversation_id: String,
}

/// Request for resetting a conversation
#[derive(Debug, Deserialize, Validate)]
pub struct ResetRequest {
    #[validate(length(min = 1))]
    pub conversation_id: String,
}

/// Response for reset
#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Send a message and stream the answer back as server-sent events
pub async fn handle_chat(
    State(state): State<ChatState>,
    ValidatedJson(req): ValidatedJson<ChatMessageRequest>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    let context = state.context.get_context().await?;

    let turn = state.store.begin_turn(&req.conversation_id).await;
    turn.record(Message::user(req.message));

    let history = turn.messages();
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(LlmMessage::from(&build_system_prompt(&context)));
    messages.extend(
        forwarded_history(&history, state.history_window)
            .iter()
            .map(LlmMessage::from),
    );

    tracing::debug!(
        conversation_id = %req.conversation_id,
        history = history.len(),
        forwarded = messages.len() - 1,
        "Relaying chat turn"
    );

    let request = ChatRequest {
        model: state.model.clone(),
        messages,
    };

    let events = relay(state.llm.clone(), request, turn).map(|event| Ok(to_sse_event(&event)));

    Ok(Sse::new(events))
}

/// Forget a conversation
pub async fn handle_reset(
    State(state): State<ChatState>,
    ValidatedJson(req): ValidatedJson<ResetRequest>,
) -> Json<ResetResponse> {
    let existed = state.store.reset(&req.conversation_id);
    tracing::info!(conversation_id = %req.conversation_id, existed, "Conversation reset");

    Json(ResetResponse {
        status: "ok",
        message: "Conversation reset",
    })
}

/// Most recent part of the history that is sent upstream
fn forwarded_history(history: &[Message], window: Option<usize>) -> &[Message] {
    match window {
        Some(window) if history.len() > window => &history[history.len() - window..],
        _ => history,
    }
}

fn to_sse_event(event: &StreamEvent) -> Event {
    let data = serde_json::to_string(event)
        .unwrap_or_else(|_| r#"{"type":"error","content":"unserializable event"}"#.to_string());
    Event::default().data(data)
}
