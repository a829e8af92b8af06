use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub is_healthy: bool,
}

/// Liveness only; says nothing about indexing progress.
pub async fn naked() -> Json<HealthResponse> {
    Json(HealthResponse { is_healthy: true })
}
