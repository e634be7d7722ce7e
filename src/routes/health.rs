use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "status": "OK", "service": crate::SERVICE_NAME, "db": "connected" })),
        ),
        Err(e) => {
            tracing::warn!("health check: database unreachable: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "error", "service": crate::SERVICE_NAME, "db": "unreachable" })),
            )
        }
    }
}
