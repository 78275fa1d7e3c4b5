//! Route configuration for coaching endpoints.

use axum::routing::{any, get, post};
use axum::Router;

use super::handlers::{api_not_found, get_advice, ping, CoachAppState};

/// Creates the coaching API router.
///
/// Routes:
/// - `POST /api/coach` - Decide whether to surface a coaching intervention
/// - `GET /api/ping` - Liveness probe
/// - `/api/*` - JSON 404 for anything else under the API prefix
pub fn coach_routes() -> Router<CoachAppState> {
    Router::new()
        .route("/api/coach", post(get_advice))
        .route("/api/ping", get(ping))
        .route("/api/*rest", any(api_not_found))
}
