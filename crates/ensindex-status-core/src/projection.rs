//! Realtime projection — how far behind realtime a snapshot may be at a
//! given wall-clock instant.

use crate::block::{DurationSecs, UnixTimestamp};
use crate::clock::dominate;
use crate::cross_chain::CrossChainIndexingStatusSnapshot;

/// Default tolerated realtime gap for uptime checks (seconds).
pub const DEFAULT_GAP_THRESHOLD: DurationSecs = 600;

/// A cross-chain snapshot projected onto a later instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealtimeIndexingStatusProjection {
    pub(crate) projected_at: UnixTimestamp,
    pub(crate) worst_case_distance: DurationSecs,
    pub(crate) snapshot: CrossChainIndexingStatusSnapshot,
}

impl RealtimeIndexingStatusProjection {
    /// Project `snapshot` onto `now`.
    ///
    /// `projected_at` is raised to the snapshot time if `now` is earlier.
    /// The distance assumes every chain produced a block in the meantime,
    /// so it is an upper bound on the lag.
    pub fn project(snapshot: CrossChainIndexingStatusSnapshot, now: UnixTimestamp) -> Self {
        let projected_at = dominate(now, snapshot.snapshot_time(), "projectedAt");
        let worst_case_distance =
            projected_at.saturating_sub(snapshot.slowest_chain_indexing_cursor());
        Self {
            projected_at,
            worst_case_distance,
            snapshot,
        }
    }

    pub fn projected_at(&self) -> UnixTimestamp {
        self.projected_at
    }

    pub fn worst_case_distance(&self) -> DurationSecs {
        self.worst_case_distance
    }

    pub fn snapshot(&self) -> &CrossChainIndexingStatusSnapshot {
        &self.snapshot
    }
}

/// Result of comparing a projection's realtime gap against a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RealtimeGapCheck {
    pub realtime_indexing_gap_threshold: DurationSecs,
    pub current_realtime_indexing_gap: DurationSecs,
    pub lowest_last_indexed_block_timestamp: UnixTimestamp,
    pub within_threshold: bool,
}

impl RealtimeGapCheck {
    pub fn evaluate(
        projection: &RealtimeIndexingStatusProjection,
        threshold: DurationSecs,
    ) -> Self {
        let gap = projection.worst_case_distance();
        Self {
            realtime_indexing_gap_threshold: threshold,
            current_realtime_indexing_gap: gap,
            lowest_last_indexed_block_timestamp: projection
                .snapshot()
                .slowest_chain_indexing_cursor(),
            within_threshold: gap <= threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::block::BlockRef;
    use crate::chain::ChainId;
    use crate::chain_status::ChainFollowingSnapshot;
    use crate::config::IndefiniteConfig;
    use crate::omnichain::OmnichainIndexingStatusSnapshot;
    use crate::parts::{CrossChainSnapshotParts, ProjectionParts};
    use crate::validate::{invariants, Validate};

    fn snapshot(cursor: u64, snapshot_time: u64) -> CrossChainIndexingStatusSnapshot {
        let chains = BTreeMap::from([(
            ChainId::new(1).unwrap(),
            ChainFollowingSnapshot {
                config: IndefiniteConfig {
                    start_block: BlockRef::new(1, 100),
                },
                latest_indexed_block: BlockRef::new(80, cursor),
                latest_known_block: BlockRef::new(81, cursor + 10),
            }
            .into(),
        )]);
        let omnichain = OmnichainIndexingStatusSnapshot::aggregate(chains).unwrap();
        CrossChainIndexingStatusSnapshot::omnichain(omnichain, snapshot_time)
    }

    #[test]
    fn projection_before_snapshot_time_is_clamped() {
        let projection = RealtimeIndexingStatusProjection::project(snapshot(900, 950), 940);
        assert_eq!(projection.projected_at(), 950);
        assert_eq!(projection.worst_case_distance(), 50);
        assert!(projection.validate().is_ok());
    }

    #[test]
    fn projection_after_snapshot_time() {
        let projection = RealtimeIndexingStatusProjection::project(snapshot(900, 950), 1000);
        assert_eq!(projection.projected_at(), 1000);
        assert_eq!(projection.worst_case_distance(), 100);
    }

    fn parts(projected_at: u64, worst_case_distance: u64) -> ProjectionParts {
        ProjectionParts {
            projected_at,
            worst_case_distance,
            snapshot: CrossChainSnapshotParts::from(&snapshot(900, 950)),
        }
    }

    #[test]
    fn parts_with_inconsistent_distance_are_rejected() {
        let err = RealtimeIndexingStatusProjection::try_from(parts(940, 40)).unwrap_err();
        assert!(err.names_invariant(invariants::PROJECTED_AT_AFTER_SNAPSHOT_TIME));
        assert!(!err.names_invariant(invariants::WORST_CASE_DISTANCE_DERIVED));

        let err = RealtimeIndexingStatusProjection::try_from(parts(1000, 10)).unwrap_err();
        assert!(err.names_invariant(invariants::WORST_CASE_DISTANCE_DERIVED));

        assert!(RealtimeIndexingStatusProjection::try_from(parts(1000, 100)).is_ok());
    }

    #[test]
    fn gap_check_against_threshold() {
        let projection = RealtimeIndexingStatusProjection::project(snapshot(900, 950), 1500);
        let within = RealtimeGapCheck::evaluate(&projection, DEFAULT_GAP_THRESHOLD);
        assert!(within.within_threshold);
        assert_eq!(within.current_realtime_indexing_gap, 600);
        assert_eq!(within.lowest_last_indexed_block_timestamp, 900);

        let beyond = RealtimeGapCheck::evaluate(&projection, 599);
        assert!(!beyond.within_threshold);
    }
}
