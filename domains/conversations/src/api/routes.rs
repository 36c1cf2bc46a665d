//! Route definitions for Conversations domain API

use axum::{routing::post, Router};

use super::handlers::chat;
use super::middleware::ChatState;

/// Create all Conversations domain API routes
pub fn routes() -> Router<ChatState> {
    Router::new()
        .route("/chat", post(chat::handle_chat))
        .route("/reset", post(chat::handle_reset))
}
