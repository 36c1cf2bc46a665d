//! Decoding of the chat completion event stream
//!
//! The upstream delivers `data: <json>` events and finishes with
//! `data: [DONE]`. Event framing is handled by `eventsource-stream`; this
//! module only interprets each event's data.

use eventsource_stream::{EventStreamError, Eventsource};
use futures::stream::BoxStream;
use futures::StreamExt;
use serde::Deserialize;

use crate::{ChunkStream, LlmError};

/// Payload that signals the normal end of the stream
pub const DONE_SENTINEL: &str = "[DONE]";

/// Classification of one upstream event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Event without data (comments, keep-alives)
    Ignored,
    /// Terminator sentinel
    Done,
    /// Non-empty content fragment
    Content(String),
    /// Well-formed record carrying no content (role preamble, finish chunk)
    Empty,
    /// Event whose data could not be interpreted
    Malformed,
}

#[derive(Debug, Deserialize)]
struct ChunkRecord {
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    delta: ChunkDelta,
}

#[derive(Debug, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Interpret the data of a single upstream event.
pub fn parse_payload(data: &str) -> Payload {
    let data = data.trim();
    if data.is_empty() {
        return Payload::Ignored;
    }
    if data == DONE_SENTINEL {
        return Payload::Done;
    }

    let record: ChunkRecord = match serde_json::from_str(data) {
        Ok(record) => record,
        Err(_) => return Payload::Malformed,
    };

    match record.choices.into_iter().next() {
        None => Payload::Malformed,
        Some(choice) => match choice.delta.content {
            Some(content) if !content.is_empty() => Payload::Content(content),
            _ => Payload::Empty,
        },
    }
}

/// Turn a raw response body into classified payloads.
///
/// Undecodable input (invalid UTF-8, a frame the parser rejects) is reported
/// as [`Payload::Malformed`] and reading continues. Only transport failures
/// surface as errors.
pub fn payloads(body: ChunkStream) -> BoxStream<'static, Result<Payload, LlmError>> {
    body.eventsource()
        .map(|item| match item {
            Ok(event) => Ok(parse_payload(&event.data)),
            Err(EventStreamError::Transport(e)) => Err(e),
            Err(e) => {
                tracing::debug!(error = ?e, "Undecodable upstream event");
                Ok(Payload::Malformed)
            }
        })
        .boxed()
}
