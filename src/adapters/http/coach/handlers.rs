//! HTTP handlers for coaching endpoints.
//!
//! These handlers connect Axum routes to the advisory command handler.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::handlers::coach::{GetAdviceCommand, GetAdviceHandler};
use crate::ports::TextGenerator;

use super::dto::{CoachRequest, CoachResponse, ErrorResponse, PingResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Error Type
// ════════════════════════════════════════════════════════════════════════════════

/// API error that implements IntoResponse.
///
/// The advisory pipeline itself never fails; these only cover requests the
/// HTTP layer cannot hand to it.
#[derive(Debug)]
pub enum CoachApiError {
    BadRequest { status: StatusCode, message: String },
    NotFound(String),
}

impl IntoResponse for CoachApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            CoachApiError::BadRequest { status, message } => {
                (status, ErrorResponse::bad_request(message))
            }
            CoachApiError::NotFound(path) => {
                (StatusCode::NOT_FOUND, ErrorResponse::not_found(&path))
            }
        };
        (status, Json(error)).into_response()
    }
}

impl From<JsonRejection> for CoachApiError {
    fn from(rejection: JsonRejection) -> Self {
        CoachApiError::BadRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state for coaching endpoints.
#[derive(Clone)]
pub struct CoachAppState {
    pub advisor: Arc<GetAdviceHandler<dyn TextGenerator>>,
}

impl CoachAppState {
    /// Builds the advisor around a text generator and its call deadline.
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self {
            advisor: Arc::new(GetAdviceHandler::new(generator, timeout)),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/coach
///
/// Returns a coaching recommendation for the submitted conversation window.
/// Any pipeline failure yields the non-intervening default, never an error.
pub async fn get_advice(
    State(state): State<CoachAppState>,
    payload: Result<Json<CoachRequest>, JsonRejection>,
) -> Result<Json<CoachResponse>, CoachApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!("Rejected coach request: {}", rejection.body_text());
        CoachApiError::from(rejection)
    })?;

    let trace_id = Uuid::new_v4().to_string();
    let response = state
        .advisor
        .handle(GetAdviceCommand::new(request, trace_id))
        .await;

    Ok(Json(response))
}

/// GET /api/ping
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse::pong())
}

/// Any unmatched /api path.
pub async fn api_not_found(uri: Uri) -> CoachApiError {
    CoachApiError::NotFound(uri.path().to_string())
}
