//! HTTP route handlers

use super::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use panel_application::ports::progress::NoProgress;
use panel_application::{RunPanelError, RunPanelInput};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

/// Body of `POST /get-ai-responses`
#[derive(Debug, Deserialize)]
pub struct PanelRequest {
    #[serde(default)]
    pub text: Option<String>,
    /// Restrict and reorder the panel for this request
    #[serde(default)]
    pub providers: Vec<String>,
    #[serde(default = "default_summarize")]
    pub summarize: bool,
}

fn default_summarize() -> bool {
    true
}

pub fn panel_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/get-ai-responses", post(get_ai_responses))
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "ai-panel is running" }))
}

fn detail(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "detail": message.into() }))).into_response()
}

async fn get_ai_responses(
    State(state): State<AppState>,
    payload: Result<Json<PanelRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection, "rejected request body");
            return detail(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let mut input =
        RunPanelInput::new(request.text.unwrap_or_default()).with_providers(request.providers);
    if !request.summarize {
        input = input.without_summary();
    }

    match state
        .use_case
        .execute_with_progress(input, &NoProgress, Some(&state.shutdown))
        .await
    {
        Ok(response) => {
            info!(
                answered = response.aggregate().successful().count(),
                total = response.aggregate().len(),
                "panel request served"
            );
            Json(response).into_response()
        }
        Err(RunPanelError::Validation(err)) => detail(StatusCode::BAD_REQUEST, err.to_string()),
        Err(RunPanelError::Cancelled) => {
            detail(StatusCode::SERVICE_UNAVAILABLE, "Server is shutting down.")
        }
    }
}
