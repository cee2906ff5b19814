use crate::page::{render_page, PageView};
use crate::query_payload::{AskForm, ChatPayload, SidebarForm};
use crate::rag_response::RagResponse;
use crate::routes::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use medbot_rag::{config, ChatbotError, ConversationEntry, ErrorResponse};
use serde_json::json;

/// Falls back to the default model when the form carries none.
fn chosen_model(model: Option<&str>) -> &str {
    match model {
        Some(m) if !m.trim().is_empty() => m,
        _ => config::default_model(),
    }
}

async fn page(state: &AppState, model: &str, latest_answer: Option<&str>, view: PageView<'_>) -> Html<String> {
    let history = state.chatbot.history().await;
    Html(render_page(&PageView {
        models: state.chatbot.models(),
        selected_model: model,
        history: &history,
        latest_answer,
        ..view
    }))
}

/// Only listed models survive; anything else falls back to the default.
fn known_model(model: Option<&str>) -> &str {
    match model {
        Some(m) if config::is_available_model(m) => m,
        _ => config::default_model(),
    }
}

pub async fn index(State(state): State<AppState>, Query(query): Query<SidebarForm>) -> Html<String> {
    let model = known_model(query.model.as_deref());
    page(&state, model, None, PageView::default()).await
}

pub async fn ask(State(state): State<AppState>, Form(form): Form<AskForm>) -> Html<String> {
    let model = chosen_model(form.model.as_deref());

    if form.question.trim().is_empty() {
        return page(&state, model, None, PageView::default()).await;
    }

    match state.chatbot.ask(&form.question, model).await {
        Ok(output) => page(&state, model, Some(&output.answer), PageView::default()).await,
        Err(e) => {
            log::warn!("Question failed: {}", e);
            let view = PageView {
                error: Some(e.to_string()),
                ..Default::default()
            };
            page(&state, model, None, view).await
        }
    }
}

pub async fn export(State(state): State<AppState>, form: Option<Form<SidebarForm>>) -> Html<String> {
    let form = form.map(|Form(f)| f).unwrap_or_default();
    let model = chosen_model(form.model.as_deref());

    let view = match state.chatbot.export().await {
        Ok(Some(path)) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            PageView {
                sidebar_success: Some(format!("Chat history exported to {}", name)),
                ..Default::default()
            }
        }
        Ok(None) => PageView {
            sidebar_info: Some("Nothing to export yet.".to_string()),
            ..Default::default()
        },
        Err(e) => {
            log::error!("{}", e);
            PageView {
                error: Some(e.to_string()),
                ..Default::default()
            }
        }
    };

    page(&state, model, None, view).await
}

pub async fn clear(State(state): State<AppState>, form: Option<Form<SidebarForm>>) -> Redirect {
    state.chatbot.clear().await;

    let form = form.map(|Form(f)| f).unwrap_or_default();
    match form.model.as_deref() {
        // Listed model names are URL-safe as they are.
        Some(m) if config::is_available_model(m) => Redirect::to(&format!("/?model={}", m)),
        _ => Redirect::to("/"),
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn api_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatPayload>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            log::warn!("Rejected chat payload: {}", rejection.body_text());
            return error_body(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let model = chosen_model(payload.model.as_deref()).to_string();

    match state.chatbot.ask(&payload.question, &model).await {
        Ok(output) => Json(RagResponse::from_output(output, &model)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn api_history(State(state): State<AppState>) -> Json<Vec<ConversationEntry>> {
    Json(state.chatbot.history().await)
}

pub async fn api_clear(State(state): State<AppState>) -> StatusCode {
    state.chatbot.clear().await;
    StatusCode::NO_CONTENT
}

fn error_response(error: ChatbotError) -> Response {
    let status = if error.is_bad_request() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::BAD_GATEWAY
    };

    error_body(status, error.to_string())
}

fn error_body(status: StatusCode, error: String) -> Response {
    (
        status,
        Json(ErrorResponse {
            status: "error".to_string(),
            error,
        }),
    )
        .into_response()
}
