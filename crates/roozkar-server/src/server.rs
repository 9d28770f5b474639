//! `ApiServer` — Axum HTTP server and router.

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use roozkar_store::{ConnectionPool, PooledConnection, StoreError};

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::handlers;
use crate::shutdown::ShutdownCoordinator;

/// Shared state accessible from Axum handlers: the storage handle,
/// passed explicitly rather than living in a process-wide singleton.
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool.
    pub pool: ConnectionPool,
}

impl AppState {
    /// Check out a pooled connection.
    pub fn conn(&self) -> Result<PooledConnection, ApiError> {
        self.pool
            .get()
            .map_err(StoreError::from)
            .map_err(ApiError::from)
    }
}

/// The API server.
pub struct ApiServer {
    config: ServerConfig,
    pool: ConnectionPool,
    shutdown: Arc<ShutdownCoordinator>,
}

impl ApiServer {
    /// Create a new server over an already-migrated pool.
    pub fn new(config: ServerConfig, pool: ConnectionPool) -> Self {
        Self {
            config,
            pool,
            shutdown: Arc::new(ShutdownCoordinator::new()),
        }
    }

    /// Build the Axum router with all routes.
    pub fn router(&self) -> Router {
        build_router(AppState {
            pool: self.pool.clone(),
        })
    }

    /// Bind and start serving. Returns the bound address and the serve
    /// task handle; the task exits when [`ShutdownCoordinator::shutdown`]
    /// fires.
    pub async fn listen(&self) -> std::io::Result<(std::net::SocketAddr, JoinHandle<()>)> {
        let listener =
            tokio::net::TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        let addr = listener.local_addr()?;
        let app = self.router();
        let token = self.shutdown.token();

        let handle = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move { token.cancelled().await })
                .await;
            if let Err(e) = result {
                tracing::error!(error = %e, "serve loop exited with error");
            }
        });

        info!(%addr, "listening");
        Ok((addr, handle))
    }

    /// Get the shutdown coordinator.
    pub fn shutdown(&self) -> &Arc<ShutdownCoordinator> {
        &self.shutdown
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Assemble routes, CORS, and tracing around the given state.
pub fn build_router(state: AppState) -> Router {
    // Browser clients are served from a different origin; anything goes.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/", get(handlers::meta::root))
        .route("/api/persian-date", get(handlers::meta::persian_date))
        .route(
            "/api/tasks",
            get(handlers::tasks::list_tasks).post(handlers::tasks::create_task),
        )
        .route(
            "/api/tasks/{id}",
            get(handlers::tasks::get_task)
                .put(handlers::tasks::update_task)
                .delete(handlers::tasks::delete_task),
        )
        .route(
            "/api/tasks/{id}/subtasks",
            post(handlers::subtasks::add_subtask),
        )
        .route(
            "/api/tasks/{id}/subtasks/{subtask_id}",
            put(handlers::subtasks::update_subtask).delete(handlers::subtasks::delete_subtask),
        )
        .route(
            "/api/lists",
            get(handlers::lists::list_lists).post(handlers::lists::create_list),
        )
        .route(
            "/api/lists/{id}",
            put(handlers::lists::update_list).delete(handlers::lists::delete_list),
        )
        .route(
            "/api/tags",
            get(handlers::tags::list_tags).post(handlers::tags::create_tag),
        )
        .route("/api/tags/{id}", delete(handlers::tags::delete_tag))
        .route("/api/stats", get(handlers::stats::dashboard_stats))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn make_state() -> AppState {
        let pool =
            roozkar_store::new_in_memory(&roozkar_store::ConnectionConfig::default()).unwrap();
        {
            let conn = pool.get().unwrap();
            let _ = roozkar_store::migrations::run_migrations(&conn).unwrap();
        }
        AppState { pool }
    }

    fn make_server() -> ApiServer {
        let state = make_state();
        ApiServer::new(ServerConfig::default(), state.pool)
    }

    #[tokio::test]
    async fn root_returns_running_message() {
        let app = make_server().router();
        let req = Request::builder().uri("/api/").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(parsed["message"].as_str().unwrap().contains("running"));
        assert!(parsed["version"].is_string());
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let app = make_server().router();
        let req = Request::builder()
            .uri("/api/nonexistent")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn persian_date_has_expected_fields() {
        let app = make_server().router();
        let req = Request::builder()
            .uri("/api/persian-date")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        for field in [
            "persian_date",
            "persian_date_long",
            "persian_time",
            "gregorian_date",
            "day_name",
            "month_name",
        ] {
            assert!(parsed.get(field).is_some(), "missing field {field}");
        }
        assert!(parsed["year"].is_number());
    }

    #[tokio::test]
    async fn cors_preflight_allows_any_origin() {
        let app = make_server().router();
        let req = Request::builder()
            .method("OPTIONS")
            .uri("/api/tasks")
            .header("origin", "http://example.com")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }

    #[tokio::test]
    async fn server_with_custom_config() {
        let state = make_state();
        let config = ServerConfig {
            host: "0.0.0.0".into(),
            port: 8001,
        };
        let server = ApiServer::new(config, state.pool);
        assert_eq!(server.config().host, "0.0.0.0");
        assert_eq!(server.config().port, 8001);
    }

    #[tokio::test]
    async fn listen_and_graceful_shutdown() {
        let server = make_server();
        let (addr, handle) = server.listen().await.unwrap();
        assert_ne!(addr.port(), 0);

        server.shutdown().shutdown();
        tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .expect("shutdown timed out")
            .expect("join error");
    }
}
