//! PdfChat application composition root
//!
//! Composes the domain routers into a single application.

use axum::{Json, Router};
use pdfchat_common::Config;
use pdfchat_conversations::{ChatState, ConversationStore};
use pdfchat_documents::DocumentContext;
use pdfchat_llm::{LlmConfig, LlmServiceFactory};
use serde_json::{json, Value};
use std::sync::Arc;

/// Create the main application router from configuration
pub fn create_app(config: &Config) -> Result<Router, anyhow::Error> {
    let llm = LlmServiceFactory::create(LlmConfig::from_config(config))?;

    let state = ChatState {
        store: ConversationStore::new(),
        context: Arc::new(DocumentContext::new(config.pdf_path.clone())),
        llm: Arc::from(llm),
        model: config.openai_model.clone(),
        history_window: config.history_window,
    };

    Ok(create_app_with(state))
}

/// Create the router around an already assembled state
pub fn create_app_with(state: ChatState) -> Router {
    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { concat!("PdfChat API v", env!("CARGO_PKG_VERSION")) }),
        )
        .merge(pdfchat_conversations::routes().with_state(state))
}

/// Health check endpoint
async fn health_check() -> Json<Value> {
    Json(json!({"status": "ok"}))
}
