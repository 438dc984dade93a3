//! HTTP request handlers

use super::types::{
    CasesResponse, ChatReply, ChatRequest, ErrorResponse, RubricResponse, RubricStepInfo,
};
use super::AppState;
use crate::chat::ChatError;
use crate::persona::CaseType;
use crate::rubric::PEARLS_STEPS;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Patient reply; any other method gets a JSON 405
        .route("/api/chat", post(send_chat).fallback(method_not_allowed))
        // Static training content
        .route("/api/cases", get(list_cases))
        .route("/api/rubric", get(get_rubric))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Chat
// ============================================================

async fn send_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, AppError> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected chat body");
        AppError::BadRequest("Invalid request body".to_string())
    })?;

    let reply = state.chat.respond(&req).await?;
    Ok(Json(reply))
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

// ============================================================
// Training content
// ============================================================

async fn list_cases() -> Json<CasesResponse> {
    Json(CasesResponse {
        cases: CaseType::ALL
            .iter()
            .map(|case| case.label().to_string())
            .collect(),
        default: None,
    })
}

async fn get_rubric() -> Json<RubricResponse> {
    Json(RubricResponse {
        steps: PEARLS_STEPS
            .iter()
            .map(|step| RubricStepInfo {
                name: step.name.to_string(),
                description: step.description.to_string(),
                example: step.example.to_string(),
            })
            .collect(),
    })
}

async fn get_version() -> &'static str {
    concat!("careview ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    MethodNotAllowed,
    Misconfigured(Option<String>),
    Upstream(Option<String>),
}

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        let message = err.to_string();
        let details = err.details();
        match err {
            ChatError::EmptyMessage => AppError::BadRequest(message),
            ChatError::NotConfigured => AppError::Misconfigured(details),
            ChatError::Upstream(e) => {
                tracing::error!(
                    kind = e.kind.as_str(),
                    error = %e.message,
                    "Chat completion failed"
                );
                AppError::Upstream(details)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new(msg)),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                ErrorResponse::new("Method not allowed"),
            ),
            AppError::Misconfigured(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                with_optional_details(
                    ErrorResponse::new(ChatError::NotConfigured.to_string()),
                    details,
                ),
            ),
            AppError::Upstream(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                with_optional_details(ErrorResponse::new("Failed to process request"), details),
            ),
        };

        (status, Json(body)).into_response()
    }
}

fn with_optional_details(body: ErrorResponse, details: Option<String>) -> ErrorResponse {
    match details {
        Some(d) => body.with_details(d),
        None => body,
    }
}
