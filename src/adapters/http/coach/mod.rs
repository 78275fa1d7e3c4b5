//! Coaching HTTP adapter module.
//!
//! - `POST /api/coach` - Advisory endpoint
//! - `GET /api/ping` - Liveness probe

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{ErrorResponse, PingResponse};
pub use handlers::{CoachApiError, CoachAppState};
pub use routes::coach_routes;
