//! Common test utilities and fixtures for integration tests
//!
//! This module provides shared infrastructure for all integration tests:
//! - A router wired to a scripted mock LLM
//! - A temporary plain-text document standing in for the PDF
//! - Request and event-stream helpers

#![allow(dead_code)]

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{Method, Request},
    Router,
};
use pdfchat_conversations::{ChatState, ConversationStore, StreamEvent};
use pdfchat_documents::{DocumentContext, DocumentError, TextExtractor};
use pdfchat_llm::mock::MockLlmService;
use serde_json::Value;

/// Document text served to every conversation in tests
pub const DOCUMENT_TEXT: &str = "Wheelchair ramps are available at every terminal.";

/// Reads the document as UTF-8, one page per form feed
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract_pages(&self, bytes: &[u8]) -> std::result::Result<Vec<String>, DocumentError> {
        let text =
            std::str::from_utf8(bytes).map_err(|e| DocumentError::Extraction(e.to_string()))?;
        Ok(text.split('\x0C').map(str::to_string).collect())
    }
}

/// Test application with inspectable collaborators
pub struct ChatTestApp {
    pub llm: MockLlmService,
    pub store: ConversationStore,
    pub context: Arc<DocumentContext>,
    _storage: Storage,
}

/// Keeps temporary files alive for the duration of a test
enum Storage {
    File(tempfile::NamedTempFile),
    Dir(tempfile::TempDir),
}

impl ChatTestApp {
    /// App whose document exists and contains [`DOCUMENT_TEXT`]
    pub fn new() -> Result<Self> {
        let mut document = tempfile::NamedTempFile::new()?;
        document.write_all(DOCUMENT_TEXT.as_bytes())?;
        document.flush()?;

        let context =
            DocumentContext::with_extractor(document.path(), Arc::new(PlainTextExtractor));

        Ok(Self {
            llm: MockLlmService::new(),
            store: ConversationStore::new(),
            context: Arc::new(context),
            _storage: Storage::File(document),
        })
    }

    /// App whose document path does not exist
    pub fn without_document() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("missing.pdf");

        Ok(Self {
            llm: MockLlmService::new(),
            store: ConversationStore::new(),
            context: Arc::new(DocumentContext::with_extractor(
                path,
                Arc::new(PlainTextExtractor),
            )),
            _storage: Storage::Dir(dir),
        })
    }

    pub fn state(&self, history_window: Option<usize>) -> ChatState {
        ChatState {
            store: self.store.clone(),
            context: Arc::clone(&self.context),
            llm: Arc::new(self.llm.clone()),
            model: "gpt-4o".to_string(),
            history_window,
        }
    }

    pub fn test_router(&self) -> Router {
        pdfchat_app::create_app_with(self.state(None))
    }

    pub fn test_router_with_window(&self, window: usize) -> Router {
        pdfchat_app::create_app_with(self.state(Some(window)))
    }
}

/// Build a JSON POST request
pub fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Parse response body as JSON Value
pub async fn parse_body(response: axum::http::Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Read an event-stream response to the end and decode every event
pub async fn parse_events(response: axum::http::Response<Body>) -> Vec<StreamEvent> {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();

    text.split("\n\n")
        .filter(|block| !block.trim().is_empty())
        .map(|block| {
            let data = block
                .strip_prefix("data: ")
                .unwrap_or_else(|| panic!("unexpected event block: {block:?}"));
            serde_json::from_str(data).unwrap()
        })
        .collect()
}
