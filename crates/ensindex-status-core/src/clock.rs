//! Clock-skew correction shared by the snapshot builder and the projector.

use tracing::debug;

use crate::block::UnixTimestamp;

/// Returns `caller_time`, raised to `lower_bound` if the caller's clock is
/// behind the data it describes.
///
/// Both `snapshotTime` and `projectedAt` go through here so their
/// dominance invariants are corrected the same way.
pub fn dominate(
    caller_time: UnixTimestamp,
    lower_bound: UnixTimestamp,
    field: &'static str,
) -> UnixTimestamp {
    if caller_time < lower_bound {
        debug!(
            field,
            caller_time,
            lower_bound,
            skew = lower_bound - caller_time,
            "caller clock is behind indexed data, clamping"
        );
        lower_bound
    } else {
        caller_time
    }
}
