use std::sync::Arc;

use axum::{extract::State, Json};

use ensindex_status_codec::{SerializedRealtimeIndexingStatusProjection, WireCodec};

use crate::error::ApiError;
use crate::service::StatusService;

pub async fn indexing_status(
    State(service): State<Arc<StatusService>>,
) -> Result<Json<SerializedRealtimeIndexingStatusProjection>, ApiError> {
    let projection = service.projection().await?;
    Ok(Json(projection.to_wire()))
}
