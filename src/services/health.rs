use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::database::connection::DatabaseManager;
use crate::dialogue::DialogueEngine;

/// Body of `/health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` when the database answers.
    pub status: String,
    /// Time of the check.
    pub timestamp: DateTime<Utc>,
    /// Crate version.
    pub version: String,
    /// Database probe result.
    pub database: DatabaseHealth,
    /// Actors with a dialogue session since startup.
    pub dialogue_sessions: usize,
    /// Seconds since the service started.
    pub uptime_seconds: u64,
}

/// Database part of the health report.
#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseHealth {
    /// `healthy` or `unhealthy`.
    pub status: String,
    /// Open pool connections.
    pub connection_pool_size: u32,
    /// Probe round trip.
    pub response_time_ms: u64,
}

/// State shared by the health routes.
#[derive(Clone)]
pub struct AppState {
    /// Database to probe.
    pub db: Arc<DatabaseManager>,
    /// Engine whose session count is reported.
    pub engine: Arc<DialogueEngine>,
    /// Service start time.
    pub start_time: DateTime<Utc>,
}

/// Health check HTTP service.
pub struct HealthService {
    /// Router with the health routes mounted.
    pub router: Router,
}

impl HealthService {
    /// Builds the router over `db` and `engine`.
    pub fn new(db: Arc<DatabaseManager>, engine: Arc<DialogueEngine>) -> Self {
        let state = AppState {
            db,
            engine,
            start_time: Utc::now(),
        };

        let router = Router::new()
            .route("/health", get(health_check))
            .route("/health/ready", get(readiness_check))
            .route("/health/live", get(liveness_check))
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
            .with_state(state);

        Self { router }
    }
}

async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, StatusCode> {
    let start = std::time::Instant::now();

    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(e) => {
            tracing::warn!("Health check database probe failed: {}", e);
            "unhealthy"
        }
    };

    let response_time_ms = start.elapsed().as_millis() as u64;
    let uptime = Utc::now()
        .signed_duration_since(state.start_time)
        .num_seconds()
        .max(0) as u64;

    if db_status != "healthy" {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: DatabaseHealth {
            status: db_status.to_string(),
            connection_pool_size: state.db.pool.size(),
            response_time_ms,
        },
        dialogue_sessions: state.engine.active_sessions().await,
        uptime_seconds: uptime,
    }))
}

async fn readiness_check(State(state): State<AppState>) -> Result<Json<&'static str>, StatusCode> {
    match state.db.ping().await {
        Ok(_) => Ok(Json("ready")),
        Err(_) => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

async fn liveness_check() -> Json<&'static str> {
    Json("alive")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::{Action, Actor};
    use axum_test::TestServer;
    use tempfile::TempDir;

    async fn create_test_health_service() -> (HealthService, Arc<DialogueEngine>, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let db = Arc::new(
            DatabaseManager::new(&db_url)
                .await
                .expect("Failed to create test database"),
        );
        db.run_migrations().await.expect("Failed to run migrations");

        let engine = Arc::new(DialogueEngine::new(db.clone(), db.clone()));
        (HealthService::new(db, engine.clone()), engine, temp_dir)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (health_service, engine, _temp_dir) = create_test_health_service().await;
        engine
            .handle(Action::menu(Actor::new("42", "Alice"), "back_to_main"))
            .await
            .expect("Dialogue turn failed");

        let server = TestServer::new(health_service.router).expect("Failed to create test server");
        let response = server.get("/health").await;

        assert_eq!(response.status_code(), StatusCode::OK);

        let health_response: HealthResponse = response.json();
        assert_eq!(health_response.status, "healthy");
        assert_eq!(health_response.database.status, "healthy");
        assert_eq!(health_response.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(health_response.dialogue_sessions, 1);
    }

    #[tokio::test]
    async fn test_readiness_endpoint() {
        let (health_service, _engine, _temp_dir) = create_test_health_service().await;
        let server = TestServer::new(health_service.router).expect("Failed to create test server");

        let response = server.get("/health/ready").await;

        assert_eq!(response.status_code(), StatusCode::OK);

        let ready_response: String = response.json();
        assert_eq!(ready_response, "ready");
    }

    #[tokio::test]
    async fn test_liveness_endpoint() {
        let (health_service, _engine, _temp_dir) = create_test_health_service().await;
        let server = TestServer::new(health_service.router).expect("Failed to create test server");

        let response = server.get("/health/live").await;

        assert_eq!(response.status_code(), StatusCode::OK);

        let alive_response: String = response.json();
        assert_eq!(alive_response, "alive");
    }
}
