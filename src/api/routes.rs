//! API Routes
//!
//! Configures the Axum router with the peer endpoint and admin endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    get_empty_key_handler, get_handler, health_handler, peer_empty_key_handler, peer_handler,
    stats_handler, AppState,
};
use crate::peers::DEFAULT_BASE_PATH;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /_gazelle/:group/:key` - Raw value bytes, used by peers
/// - `GET /api/:group/:key` - Value as JSON
///
/// A trailing slash with no key (`/_gazelle/:group/`, `/api/:group/`) is an
/// empty key and answers 400.
/// - `GET /stats/:group` - Group and store statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(&format!("/{DEFAULT_BASE_PATH}/:group/:key"), get(peer_handler))
        .route(&format!("/{DEFAULT_BASE_PATH}/:group/"), get(peer_empty_key_handler))
        .route("/api/:group/:key", get(get_handler))
        .route("/api/:group/", get(get_empty_key_handler))
        .route("/stats/:group", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::{GroupRegistry, LoaderFn};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let registry = Arc::new(GroupRegistry::new());
        registry.new_group(
            "scores",
            2 << 10,
            LoaderFn(|key: &str| -> anyhow::Result<Vec<u8>> {
                match key {
                    "Tom" => Ok(b"630".to_vec()),
                    _ => anyhow::bail!("{key} not exist"),
                }
            }),
        );
        create_router(AppState::new(registry))
    }

    async fn get_status(app: Router, uri: &str) -> StatusCode {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        assert_eq!(get_status(create_test_app(), "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_peer_endpoint_returns_bytes() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/_gazelle/scores/Tom")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "application/octet-stream"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"630");
    }

    #[tokio::test]
    async fn test_peer_endpoint_unknown_group() {
        assert_eq!(
            get_status(create_test_app(), "/_gazelle/nope/Tom").await,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_peer_endpoint_load_error() {
        assert_eq!(
            get_status(create_test_app(), "/_gazelle/scores/Ghost").await,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_empty_key_is_bad_request() {
        let app = create_test_app();
        assert_eq!(
            get_status(app.clone(), "/_gazelle/scores/").await,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(get_status(app, "/api/scores/").await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_peer_route_follows_base_path() {
        let uri = format!("/{DEFAULT_BASE_PATH}/scores/Tom");
        assert_eq!(get_status(create_test_app(), &uri).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let app = create_test_app();
        assert_eq!(get_status(app.clone(), "/stats/scores").await, StatusCode::OK);
        assert_eq!(get_status(app, "/stats/nope").await, StatusCode::NOT_FOUND);
    }
}
