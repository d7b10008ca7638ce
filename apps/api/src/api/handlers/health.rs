use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "timestamp": Utc::now(),
    }))
}
