//! Query parameters.

use serde::Deserialize;

use ensindex_status_core::DurationSecs;

use crate::error::ApiError;

/// Raw `/amirealtime` query. Kept as a string so a malformed value becomes
/// a 400 with our own message rather than the extractor's rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapParameters {
    pub gap_threshold: Option<String>,
}

impl GapParameters {
    pub fn gap_threshold(&self, default: DurationSecs) -> Result<DurationSecs, ApiError> {
        match self.gap_threshold.as_deref().map(str::trim) {
            None | Some("") => Ok(default),
            Some(raw) if raw.bytes().all(|b| b.is_ascii_digit()) => raw.parse().map_err(|_| {
                ApiError::invalid_query(format!("gapThreshold is too large: {raw}"))
            }),
            Some(raw) => Err(ApiError::invalid_query(format!(
                "gapThreshold must be a non-negative integer, got {raw:?}"
            ))),
        }
    }
}
