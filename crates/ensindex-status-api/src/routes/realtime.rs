use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use ensindex_status_core::{DurationSecs, RealtimeGapCheck, UnixTimestamp};

use crate::error::ApiError;
use crate::params::GapParameters;
use crate::service::StatusService;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeGapResponse {
    pub realtime_indexing_gap_threshold: DurationSecs,
    pub current_realtime_indexing_gap: DurationSecs,
    pub lowest_last_indexed_block_timestamp: UnixTimestamp,
}

impl From<RealtimeGapCheck> for RealtimeGapResponse {
    fn from(check: RealtimeGapCheck) -> Self {
        Self {
            realtime_indexing_gap_threshold: check.realtime_indexing_gap_threshold,
            current_realtime_indexing_gap: check.current_realtime_indexing_gap,
            lowest_last_indexed_block_timestamp: check.lowest_last_indexed_block_timestamp,
        }
    }
}

/// `200` when the worst-case distance is within the threshold, `503` otherwise.
pub async fn am_i_realtime(
    State(service): State<Arc<StatusService>>,
    Query(params): Query<GapParameters>,
) -> Result<(StatusCode, Json<RealtimeGapResponse>), ApiError> {
    let threshold = params.gap_threshold(service.default_gap_threshold())?;
    let projection = service.projection().await?;
    let check = RealtimeGapCheck::evaluate(&projection, threshold);

    let status = if check.within_threshold {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    Ok((status, Json(check.into())))
}
