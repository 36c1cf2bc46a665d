//! Streaming relay from the chat completion API to the client
//!
//! Turns the upstream event-stream body into [`StreamEvent`]s while
//! accumulating the full answer. The relay always ends with exactly one
//! `Done` event; at most one `Error` event precedes it, and no content
//! follows an error. The answer is recorded in the conversation only when
//! the upstream finished without error.

use std::sync::Arc;

use futures::{Stream, StreamExt};
use pdfchat_llm::sse::{self, Payload};
use pdfchat_llm::{ChatRequest, LlmService};

use super::entities::{Message, StreamEvent};
use crate::repository::Turn;

/// Relay one chat turn.
///
/// The returned stream is lazy: nothing is sent upstream until it is first
/// polled. Dropping it mid-way (client disconnect) abandons the upstream
/// response and records nothing. The turn is released when the stream ends
/// or is dropped.
pub fn relay(
    llm: Arc<dyn LlmService>,
    request: ChatRequest,
    turn: Turn,
) -> impl Stream<Item = StreamEvent> + Send + 'static {
    async_stream::stream! {
        let mut answer = String::new();
        let mut fragments: usize = 0;
        let mut skipped_lines: usize = 0;
        let mut failure: Option<String> = None;

        match llm.stream_chat(request).await {
            Err(e) => failure = Some(e.to_string()),
            Ok(body) => {
                let mut payloads = sse::payloads(body);

                while let Some(item) = payloads.next().await {
                    match item {
                        Ok(Payload::Done) => break,
                        Ok(Payload::Content(fragment)) => {
                            answer.push_str(&fragment);
                            fragments += 1;
                            yield StreamEvent::content(fragment);
                        }
                        Ok(Payload::Malformed) => skipped_lines += 1,
                        Ok(Payload::Ignored | Payload::Empty) => {}
                        Err(e) => {
                            failure = Some(e.to_string());
                            break;
                        }
                    }
                }
            }
        }

        match failure {
            Some(description) => {
                tracing::warn!(
                    conversation_id = %turn.conversation_id(),
                    error = %description,
                    fragments,
                    "Chat completion stream failed"
                );
                yield StreamEvent::error(description);
            }
            None => {
                tracing::info!(
                    conversation_id = %turn.conversation_id(),
                    fragments,
                    skipped_lines,
                    chars = answer.len(),
                    "Chat completion stream finished"
                );
                turn.record(Message::assistant(answer));
            }
        }

        drop(turn);
        yield StreamEvent::Done;
    }
}
