//! Health check handlers.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: "ok" or "degraded".
    pub status: String,
    /// Database reachability.
    pub database: String,
}

/// GET /api/health
///
/// No auth required; pings the database so load balancers see a real
/// readiness signal.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database_ok = sqlx::query("SELECT 1")
        .execute(&state.db_pool)
        .await
        .is_ok();

    let (status, database) = if database_ok {
        ("ok", "up")
    } else {
        ("degraded", "down")
    };

    Json(HealthResponse {
        status: status.to_string(),
        database: database.to_string(),
    })
}
