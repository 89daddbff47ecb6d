use axum::{extract::State, http::StatusCode, response::Json};
use serde::Serialize;
use sqlx::sqlite::SqlitePool;

use crate::db;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    timestamp: i64,
}

// GET /health - Storage round-trip check
pub async fn health_check(State(pool): State<SqlitePool>) -> (StatusCode, Json<HealthResponse>) {
    let (code, status) = match db::ping(&pool).await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(err) => {
            tracing::warn!(error = %err, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    let response = HealthResponse {
        status: status.to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    };

    (code, Json(response))
}
