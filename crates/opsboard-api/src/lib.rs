//! opsboard-api - HTTP surface of the dashboard
//!
//! Serves one status endpoint backed by a [`SummaryComposer`]. The handler
//! never caches; each request re-reads the log source.
//!
//! # Usage
//!
//! ```ignore
//! use opsboard_api::{create_router, AppState};
//! use opsboard_sources::LocalLogSource;
//!
//! let state = AppState::from_source(Arc::new(LocalLogSource::new("/var/log/agents")));
//! let router = create_router(state);
//! ```
//!
//! [`SummaryComposer`]: opsboard_fleet::SummaryComposer

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Path of the status endpoint
pub const STATUS_PATH: &str = "/api/logs/status";

/// Create the dashboard router with the given application state
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route(STATUS_PATH, get(handlers::status::get_status))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use opsboard_sources::{LocalLogSource, MockLogSource};
    use pretty_assertions::assert_eq;
    use serde_json::Value;
    use tower::ServiceExt;

    fn demo_router() -> Router {
        create_router(AppState::from_source(Arc::new(MockLogSource::demo())))
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let response = demo_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_summary_is_default_view() {
        let (status, json) = get_json(demo_router(), STATUS_PATH).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert!(json.get("fallback").is_none());
        assert_eq!(json["data"]["gateway"]["status"], "online");
        assert_eq!(json["data"]["jobs"].as_array().unwrap().len(), 5);
        assert!(json["lastUpdated"].is_string());

        let (_, explicit) = get_json(demo_router(), "/api/logs/status?type=summary").await;
        assert_eq!(explicit["data"], json["data"]);
    }

    #[tokio::test]
    async fn test_partial_views() {
        let (status, json) = get_json(demo_router(), "/api/logs/status?type=gateway").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "online");

        let (_, json) = get_json(demo_router(), "/api/logs/status?type=cron").await;
        assert_eq!(json["data"]["last24h"]["total"], 5);
        assert_eq!(json["data"]["last24h"]["failed"], 1);

        let (_, json) = get_json(demo_router(), "/api/logs/status?type=logs").await;
        assert_eq!(json["data"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_file_view() {
        let (status, json) =
            get_json(demo_router(), "/api/logs/status?type=file&name=ai_lesson.log").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["fileName"], "ai_lesson.log");
        assert_eq!(json["data"]["entries"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_file_view_errors() {
        let (status, json) = get_json(demo_router(), "/api/logs/status?type=file").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "File name required");

        let (status, _) = get_json(demo_router(), "/api/logs/status?type=file&name=").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) =
            get_json(demo_router(), "/api/logs/status?type=file&name=ghost.log").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "File not found");

        let (status, _) =
            get_json(demo_router(), "/api/logs/status?type=file&name=..%2Fsecret.log").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unreadable_file_returns_fallback() {
        let source = MockLogSource::new();
        source.add_file("broken.log", "2025-01-01 00:00:00 - x\n");
        source.fail_reads("broken.log");
        let router = create_router(AppState::from_source(Arc::new(source)));

        let (status, json) =
            get_json(router, "/api/logs/status?type=file&name=broken.log").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], false);
        assert_eq!(json["fallback"], true);
        assert_eq!(json["error"], "Failed to parse logs");
    }

    #[tokio::test]
    async fn test_invalid_type() {
        let (status, json) = get_json(demo_router(), "/api/logs/status?type=metrics").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Invalid type parameter");
    }

    #[tokio::test]
    async fn test_missing_directory_wins_over_type() {
        let router = create_router(AppState::from_source(Arc::new(LocalLogSource::new(
            "/nonexistent/opsboard/logs",
        ))));

        for uri in [
            STATUS_PATH,
            "/api/logs/status?type=cron",
            "/api/logs/status?type=file",
            "/api/logs/status?type=metrics",
        ] {
            let (status, json) = get_json(router.clone(), uri).await;
            assert_eq!(status, StatusCode::OK, "{}", uri);
            assert_eq!(json["success"], false);
            assert_eq!(json["fallback"], true);
            assert_eq!(json["error"], "Logs directory not found");
            assert_eq!(json["data"]["gateway"]["status"], "unknown");
            assert_eq!(json["data"]["jobs"], serde_json::json!([]));
        }
    }
}
