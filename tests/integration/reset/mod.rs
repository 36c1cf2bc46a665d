//! Reset handler integration tests

use axum::http::StatusCode;
use pdfchat_conversations::Message;
use pdfchat_llm::mock::MockReply;
use serde_json::json;
use tower::ServiceExt;

use crate::common::{json_request, parse_body, parse_events, ChatTestApp};

#[tokio::test]
async fn test_reset_existing_conversation() {
    let app = ChatTestApp::new().unwrap();
    app.store.append("c1", Message::user("Hi"));
    app.store.append("c1", Message::assistant("Hello"));

    let resp = app
        .test_router()
        .oneshot(json_request("/reset", json!({"conversation_id": "c1"})))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = parse_body(resp).await;
    assert_eq!(body, json!({"status": "ok", "message": "Conversation reset"}));
    assert!(app.store.get_history("c1").is_empty());
}

#[tokio::test]
async fn test_reset_unknown_conversation_is_ok() {
    let app = ChatTestApp::new().unwrap();

    let resp = app
        .test_router()
        .oneshot(json_request("/reset", json!({"conversation_id": "never-seen"})))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = parse_body(resp).await;
    assert_eq!(body["status"], "ok");
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn test_reset_leaves_other_conversations() {
    let app = ChatTestApp::new().unwrap();
    app.store.append("keep", Message::user("stay"));
    app.store.append("drop", Message::user("go"));

    let resp = app
        .test_router()
        .oneshot(json_request("/reset", json!({"conversation_id": "drop"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(app.store.get_history("keep"), vec![Message::user("stay")]);
    assert!(app.store.get_history("drop").is_empty());
}

#[tokio::test]
async fn test_chat_after_reset_starts_fresh() {
    let app = ChatTestApp::new().unwrap();
    app.llm.push_reply(MockReply::fragments(&["Earlier answer"]));
    app.llm.push_reply(MockReply::fragments(&["Fresh answer"]));

    let resp = app
        .test_router()
        .oneshot(json_request(
            "/chat",
            json!({"message": "Earlier question", "conversation_id": "c1"}),
        ))
        .await
        .unwrap();
    parse_events(resp).await;

    app.test_router()
        .oneshot(json_request("/reset", json!({"conversation_id": "c1"})))
        .await
        .unwrap();

    let resp = app
        .test_router()
        .oneshot(json_request(
            "/chat",
            json!({"message": "New question", "conversation_id": "c1"}),
        ))
        .await
        .unwrap();
    parse_events(resp).await;

    let requests = app.llm.recorded_requests();
    assert_eq!(requests.len(), 2);
    // System prompt plus the new question only
    assert_eq!(requests[1].messages.len(), 2);
    assert_eq!(requests[1].messages[1].content, "New question");

    assert_eq!(
        app.store.get_history("c1"),
        vec![
            Message::user("New question"),
            Message::assistant("Fresh answer")
        ]
    );
}

#[tokio::test]
async fn test_reset_missing_conversation_id_returns_400() {
    let app = ChatTestApp::new().unwrap();

    let resp = app
        .test_router()
        .oneshot(json_request("/reset", json!({})))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(resp).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = ChatTestApp::without_document().unwrap();

    let resp = app
        .test_router()
        .oneshot(
            axum::http::Request::get("/health")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(parse_body(resp).await, json!({"status": "ok"}));
}
