use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;

/// GET /health - liveness plus a round trip to the record store
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.repository.ping().await.map_err(|e| {
        tracing::error!("Health check failed: {}", e);
        ApiError::service_unavailable(format!("record store unavailable: {e}"))
    })?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
            "store": "ok"
        }
    })))
}
