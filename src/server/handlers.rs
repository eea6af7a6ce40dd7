use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::{error, warn};

use super::AppState;
use crate::error::RelayError;
use crate::llm::analyze_message;
use crate::models::{AnalysisRequest, RequestError};

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": true, "message": message }))).into_response()
}

/// Reports whether the relay is configured well enough to serve requests.
pub async fn status_handler(State(state): State<AppState>) -> Response {
    match state.config.validate() {
        Ok(kind) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "message": format!("AI API is running and configured for {}", kind),
                "model": state.config.model,
                "provider": kind.name(),
            })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "status": "error", "message": e.to_string() })),
        )
            .into_response(),
    }
}

pub async fn analyze_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let parsed = match payload {
        Ok(Json(body)) => AnalysisRequest::from_json(&body),
        Err(_) => Err(RequestError::MissingMessage),
    };
    let request = match parsed {
        Ok(request) => request,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    let kind = match state.config.provider_kind() {
        Ok(kind) => kind,
        Err(RelayError::UnknownProvider { provider }) => {
            warn!("Rejected analysis for unsupported provider {}", provider);
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Unsupported API provider: {}", provider),
            );
        }
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };
    if let Err(e) = state.config.api_key() {
        return error_response(StatusCode::BAD_REQUEST, e.to_string());
    }

    match analyze_message(&state.client, kind, &request, &state.config).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) if e.is_configuration() => error_response(StatusCode::BAD_REQUEST, e.to_string()),
        Err(e) => {
            error!("Error analyzing message: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error analyzing message: {}", e),
            )
        }
    }
}
