pub mod events;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use eventsched_core::EventError;
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Build the full application: routes, state, CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(events::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors a handler can return, each mapped to one status code.
/// Internal details are logged, never sent to the client.
#[derive(Debug)]
pub enum AppError {
    InvalidInput(String),
    Conflict(String),
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidInput(reason) => {
                tracing::info!(%reason, "rejected invalid input");
                (StatusCode::BAD_REQUEST, "Invalid input")
            }
            AppError::Conflict(reason) => {
                tracing::info!(%reason, "rejected conflicting event");
                (StatusCode::CONFLICT, "Event overlaps with an existing event")
            }
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(ErrorResponse {
            error: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        if !err.is_rejection() {
            return AppError::Internal(err.into());
        }
        match err {
            EventError::Overlap { .. } => AppError::Conflict(err.to_string()),
            _ => AppError::InvalidInput(err.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(err.into())
    }
}
