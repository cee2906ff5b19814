//! Router tests for the chat page and JSON API, with the hosted services stubbed out.

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use medbot_api::{create_app, AppState};
use medbot_rag::{ChatMessage, ChatModel, Chatbot, Document, DocumentRetriever};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tower::util::ServiceExt;

struct OneDocument;

#[async_trait]
impl DocumentRetriever for OneDocument {
    async fn retrieve(&self, _query: &str) -> anyhow::Result<Vec<Document>> {
        Ok(vec![Document {
            id: "doc-1".to_string(),
            page_content: "Migraines are recurring headaches.".to_string(),
            metadata: Default::default(),
            score: Some(0.93),
        }])
    }
}

/// Echoes the last user message, or fails when asked about "outage".
struct EchoModel;

#[async_trait]
impl ChatModel for EchoModel {
    async fn chat(&self, model: &str, messages: &[ChatMessage]) -> anyhow::Result<String> {
        let question = messages.last().map(|m| m.content.clone()).unwrap_or_default();
        if question.contains("outage") {
            return Err(anyhow::anyhow!("Groq API error (503 Service Unavailable): down"));
        }
        Ok(format!("[{}] You asked: {}", model, question))
    }
}

fn app(export_dir: &Path) -> Router {
    let chatbot = Chatbot::new(Arc::new(OneDocument), Arc::new(EchoModel), export_dir.to_path_buf());
    create_app(AppState::new(chatbot))
}

fn form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn index_renders_empty_chat() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(dir.path()).oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("<h1>Medical Chatbot</h1>"));
    assert!(html.contains("Ask a medical question:"));
    assert!(html.contains(r#"<option value="llama3-8b-8192" selected>"#));
    assert!(html.contains("Export Chat History"));
    assert!(html.contains("Clear Chat"));
}

#[tokio::test]
async fn asking_shows_answer_and_conversation() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let response = app
        .clone()
        .oneshot(form("/ask", "question=Why+do+I+get+migraines%3F&model=grok-beta"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("<strong>Bot:</strong> [grok-beta] You asked: Why do I get migraines?"));
    assert!(html.contains("<strong>User:</strong> Why do I get migraines?"));
    assert!(html.contains(r#"<option value="grok-beta" selected>"#));

    let response = app.oneshot(get("/api/history")).await.unwrap();
    let history: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(history[0][0], "User");
    assert_eq!(history[1][0], "Bot");
}

#[tokio::test]
async fn failed_question_shows_error_banner() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let response = app
        .clone()
        .oneshot(form("/ask", "question=is+there+an+outage&model=llama3-8b-8192"))
        .await
        .unwrap();

    let html = body_text(response).await;
    assert!(html.contains(r#"<p class="error">Error processing query:"#));

    let response = app.oneshot(get("/api/history")).await.unwrap();
    assert_eq!(body_text(response).await, "[]");
}

#[tokio::test]
async fn export_then_clear() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let html = body_text(app.clone().oneshot(form("/export", "model=llama3-8b-8192")).await.unwrap()).await;
    assert!(html.contains("Nothing to export yet."));

    app.clone()
        .oneshot(form("/ask", "question=headache&model=llama3-8b-8192"))
        .await
        .unwrap();

    let html = body_text(app.clone().oneshot(form("/export", "model=llama3-8b-8192")).await.unwrap()).await;
    assert!(html.contains("Chat history exported to chat_history_"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

    let response = app.clone().oneshot(form("/clear", "model=llama3-8b-8192")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/?model=llama3-8b-8192");

    let response = app.oneshot(get("/api/history")).await.unwrap();
    assert_eq!(body_text(response).await, "[]");
}

#[tokio::test]
async fn api_chat_returns_answer_and_snippets() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(dir.path())
        .oneshot(json_request(
            Method::POST,
            "/api/chat",
            serde_json::json!({ "question": "What is a migraine?" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["model"], "llama3-8b-8192");
    assert_eq!(body["answer"], "[llama3-8b-8192] You asked: What is a migraine?");
    assert_eq!(body["context_snippets"][0], "Migraines are recurring headaches.");
}

#[tokio::test]
async fn api_chat_maps_errors_to_status() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/chat",
            serde_json::json!({ "question": "hi", "model": "gpt-4" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["status"], "error");

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/chat",
            serde_json::json!({ "question": "outage?" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn delete_history_clears_log() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    app.clone()
        .oneshot(json_request(Method::POST, "/api/chat", serde_json::json!({ "question": "fever" })))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(Request::builder().method(Method::DELETE).uri("/api/history").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(get("/api/history")).await.unwrap();
    assert_eq!(body_text(response).await, "[]");
}

#[tokio::test]
async fn health_is_ok() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(dir.path()).oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, r#"{"status":"ok"}"#);
}

#[tokio::test]
async fn clear_keeps_selected_model() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let response = app.clone().oneshot(form("/clear", "model=grok-beta")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/?model=grok-beta");

    let html = body_text(app.clone().oneshot(get("/?model=grok-beta")).await.unwrap()).await;
    assert!(html.contains(r#"<option value="grok-beta" selected>"#));

    let response = app.clone().oneshot(form("/clear", "model=not-a-model")).await.unwrap();
    assert_eq!(response.headers()[header::LOCATION], "/");

    let html = body_text(app.oneshot(get("/?model=not-a-model")).await.unwrap()).await;
    assert!(html.contains(r#"<option value="llama3-8b-8192" selected>"#));
}

#[tokio::test]
async fn blank_question_on_page_records_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let response = app
        .clone()
        .oneshot(form("/ask", "question=+++&model=grok-beta"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Ask a medical question:"));
    assert!(!html.contains(r#"class="error""#));
    assert!(!html.contains(r#"class="latest""#));

    let response = app.oneshot(get("/api/history")).await.unwrap();
    assert_eq!(body_text(response).await, "[]");
}

#[tokio::test]
async fn api_chat_rejects_blank_question() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(dir.path())
        .oneshot(json_request(
            Method::POST,
            "/api/chat",
            serde_json::json!({ "question": "   \t " }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"], "Question must not be empty");
}

#[tokio::test]
async fn api_chat_rejects_unusable_bodies_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/chat",
            serde_json::json!({ "model": "grok-beta" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["status"], "error");
    assert!(body["error"].as_str().unwrap().contains("question"));

    let malformed = Request::builder()
        .method(Method::POST)
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"question\": "))
        .unwrap();
    let response = app.oneshot(malformed).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["status"], "error");
}
