//! HTTP adapters - REST API implementations.
//!
//! The API lives under `/api`; every other path is handed to the static
//! single-page application.

pub mod coach;
pub mod spa;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

pub use coach::{coach_routes, CoachAppState};
pub use spa::spa_service;

/// Builds the complete application router.
pub fn app_router(state: CoachAppState, server: &ServerConfig) -> Router {
    Router::new()
        .merge(coach_routes())
        .with_state(state)
        .fallback_service(spa_service(&server.static_dir))
        .layer(cors_layer(&server.cors_origins_list()))
        .layer(TraceLayer::new_for_http())
}

/// Any origin when none are configured, otherwise exactly the listed ones.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockTextGenerator;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn state() -> CoachAppState {
        CoachAppState::new(Arc::new(MockTextGenerator::new()), Duration::from_secs(5))
    }

    fn server_with_static(dir: &std::path::Path) -> ServerConfig {
        ServerConfig {
            static_dir: dir.to_path_buf(),
            ..Default::default()
        }
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn static_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>coach</html>").unwrap();
        std::fs::create_dir(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets/app.js"), "console.log('hi')").unwrap();
        dir
    }

    #[tokio::test]
    async fn client_routes_fall_back_to_index() {
        let dir = static_dir();
        let app = app_router(state(), &server_with_static(dir.path()));

        let response = app
            .oneshot(Request::builder().uri("/session/42").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "<html>coach</html>");
    }

    #[tokio::test]
    async fn static_assets_are_served() {
        let dir = static_dir();
        let app = app_router(state(), &server_with_static(dir.path()));

        let response = app
            .oneshot(Request::builder().uri("/assets/app.js").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "console.log('hi')");
    }

    #[tokio::test]
    async fn api_paths_never_reach_the_spa() {
        let dir = static_dir();
        let app = app_router(state(), &server_with_static(dir.path()));

        let response = app
            .oneshot(Request::builder().uri("/api/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("NOT_FOUND"));
    }

    #[tokio::test]
    async fn any_origin_allowed_by_default() {
        let dir = static_dir();
        let app = app_router(state(), &server_with_static(dir.path()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/ping")
                    .header(header::ORIGIN, "http://elsewhere.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn configured_origins_are_enforced() {
        let dir = static_dir();
        let server = ServerConfig {
            cors_origins: Some("http://localhost:5173".to_string()),
            ..server_with_static(dir.path())
        };
        let app = app_router(state(), &server);

        let allowed = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/ping")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            allowed.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );

        let denied = app
            .oneshot(
                Request::builder()
                    .uri("/api/ping")
                    .header(header::ORIGIN, "http://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(denied.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
