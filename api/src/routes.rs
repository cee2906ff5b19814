use crate::handlers;
use axum::{
    routing::{get, post},
    Router,
};
use medbot_rag::Chatbot;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    pub chatbot: Arc<Chatbot>,
}

impl AppState {
    pub fn new(chatbot: Chatbot) -> Self {
        Self {
            chatbot: Arc::new(chatbot),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/ask", post(handlers::ask))
        .route("/export", post(handlers::export))
        .route("/clear", post(handlers::clear))
        .route("/health", get(handlers::health))
        .route("/api/chat", post(handlers::api_chat))
        .route("/api/history", get(handlers::api_history).delete(handlers::api_clear))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(state)
}
