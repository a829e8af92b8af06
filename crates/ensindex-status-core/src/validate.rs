//! Invariant checks for every indexing status value.
//!
//! Each invariant is a standalone `check_*` function returning a [`Check`].
//! The [`Validate`] implementations compose them and collect every failure
//! before reporting, so a malformed snapshot yields the complete list of
//! broken relationships in one [`StatusError::InvariantViolation`].

use std::collections::BTreeMap;

use crate::block::{BlockRef, UnixTimestamp};
use crate::chain::ChainId;
use crate::chain_status::{ChainIndexingStatusSnapshot, ChainStatus};
use crate::config::{ChainIndexingConfig, ChainIndexingConfigType, DefiniteConfig};
use crate::cross_chain::CrossChainIndexingStatusSnapshot;
use crate::error::{StatusError, Violation};
use crate::omnichain::{self, OmnichainIndexingStatus, OmnichainIndexingStatusSnapshot};
use crate::projection::RealtimeIndexingStatusProjection;

/// Outcome of a single invariant check.
pub type Check = Result<(), Violation>;

/// Names of the invariants reported in [`Violation::invariant`].
pub mod invariants {
    pub const CONFIG_START_BEFORE_END: &str = "config.startBlock <= config.endBlock";
    pub const START_BEFORE_LATEST_INDEXED: &str = "config.startBlock <= latestIndexedBlock";
    pub const LATEST_INDEXED_BEFORE_BACKFILL_END: &str = "latestIndexedBlock <= backfillEndBlock";
    pub const BACKFILL_END_IS_CONFIG_END: &str = "backfillEndBlock == config.endBlock";
    pub const LATEST_INDEXED_BEFORE_LATEST_KNOWN: &str = "latestIndexedBlock <= latestKnownBlock";
    pub const LATEST_INDEXED_BEFORE_CONFIG_END: &str = "latestIndexedBlock <= config.endBlock";
    pub const CONFIG_TYPE_MATCHES_STATUS: &str =
        "config.configType is indefinite for Following and definite for Completed";
    pub const CHAINS_NOT_EMPTY: &str = "chains is not empty";
    pub const OMNICHAIN_STATUS_DERIVED: &str = "omnichainStatus == derive(chains[*].chainStatus)";
    pub const OMNICHAIN_CURSOR_DERIVED: &str =
        "omnichainIndexingCursor == max(chains[*].latestIndexedBlock.timestamp)";
    pub const OMNICHAIN_CURSOR_BEFORE_QUEUED_STARTS: &str =
        "omnichainIndexingCursor < min(queued chains[*].config.startBlock.timestamp)";
    pub const SLOWEST_CURSOR_MATCHES_OMNICHAIN: &str =
        "slowestChainIndexingCursor == omnichainSnapshot.omnichainIndexingCursor";
    pub const SNAPSHOT_TIME_AFTER_CURSOR: &str = "snapshotTime >= slowestChainIndexingCursor";
    pub const SNAPSHOT_TIME_AFTER_KNOWN_BLOCKS: &str =
        "snapshotTime >= chains[*].highestKnownBlock.timestamp";
    pub const PROJECTED_AT_AFTER_SNAPSHOT_TIME: &str = "projectedAt >= snapshot.snapshotTime";
    pub const WORST_CASE_DISTANCE_DERIVED: &str =
        "worstCaseDistance == projectedAt - snapshot.slowestChainIndexingCursor";
}

/// A value whose invariants can be checked.
pub trait Validate {
    /// Every invariant this value breaks, empty if it is valid.
    fn violations(&self) -> Vec<Violation>;

    /// Fails with all violations at once.
    fn validate(&self) -> Result<(), StatusError> {
        into_result(self.violations())
    }
}

/// Turn a list of violations into a result.
pub fn into_result(details: Vec<Violation>) -> Result<(), StatusError> {
    if details.is_empty() {
        Ok(())
    } else {
        Err(StatusError::InvariantViolation { details })
    }
}

fn collect(checks: impl IntoIterator<Item = Check>) -> Vec<Violation> {
    checks.into_iter().filter_map(Result::err).collect()
}

fn ordered(
    invariant: &'static str,
    earlier_name: &str,
    earlier: BlockRef,
    later_name: &str,
    later: BlockRef,
) -> Check {
    if earlier.is_before_or_equal(&later) {
        Ok(())
    } else {
        Err(Violation::new(
            invariant,
            format!("{earlier_name} ({earlier}) must not be after {later_name} ({later})"),
        ))
    }
}

// ─── Per-chain checks ─────────────────────────────────────────────────────────

pub fn check_config_start_before_end(config: &DefiniteConfig) -> Check {
    ordered(
        invariants::CONFIG_START_BEFORE_END,
        "config.startBlock",
        config.start_block,
        "config.endBlock",
        config.end_block,
    )
}

pub fn check_start_before_latest_indexed(start_block: BlockRef, latest_indexed: BlockRef) -> Check {
    ordered(
        invariants::START_BEFORE_LATEST_INDEXED,
        "config.startBlock",
        start_block,
        "latestIndexedBlock",
        latest_indexed,
    )
}

pub fn check_latest_indexed_before_backfill_end(
    latest_indexed: BlockRef,
    backfill_end: BlockRef,
) -> Check {
    ordered(
        invariants::LATEST_INDEXED_BEFORE_BACKFILL_END,
        "latestIndexedBlock",
        latest_indexed,
        "backfillEndBlock",
        backfill_end,
    )
}

pub fn check_backfill_end_is_config_end(
    config: &ChainIndexingConfig,
    backfill_end: BlockRef,
) -> Check {
    match config.end_block() {
        Some(end_block) if end_block != backfill_end => Err(Violation::new(
            invariants::BACKFILL_END_IS_CONFIG_END,
            format!("backfillEndBlock ({backfill_end}) differs from config.endBlock ({end_block})"),
        )),
        _ => Ok(()),
    }
}

pub fn check_latest_indexed_before_latest_known(
    latest_indexed: BlockRef,
    latest_known: BlockRef,
) -> Check {
    ordered(
        invariants::LATEST_INDEXED_BEFORE_LATEST_KNOWN,
        "latestIndexedBlock",
        latest_indexed,
        "latestKnownBlock",
        latest_known,
    )
}

pub fn check_latest_indexed_before_config_end(
    latest_indexed: BlockRef,
    config: &DefiniteConfig,
) -> Check {
    ordered(
        invariants::LATEST_INDEXED_BEFORE_CONFIG_END,
        "latestIndexedBlock",
        latest_indexed,
        "config.endBlock",
        config.end_block,
    )
}

/// `Following` needs an indefinite config and `Completed` a definite one.
///
/// The domain types already guarantee this; decoders call it before they
/// build those variants from loosely typed input.
pub fn check_config_type_matches_status(
    status: ChainStatus,
    config_type: ChainIndexingConfigType,
) -> Check {
    let expected = match status {
        ChainStatus::Following => ChainIndexingConfigType::Indefinite,
        ChainStatus::Completed => ChainIndexingConfigType::Definite,
        ChainStatus::Queued | ChainStatus::Backfill => return Ok(()),
    };
    if config_type == expected {
        Ok(())
    } else {
        Err(Violation::new(
            invariants::CONFIG_TYPE_MATCHES_STATUS,
            format!("a {status} chain requires config type {expected}, got {config_type}"),
        ))
    }
}

impl Validate for ChainIndexingConfig {
    fn violations(&self) -> Vec<Violation> {
        match self {
            ChainIndexingConfig::Indefinite(_) => Vec::new(),
            ChainIndexingConfig::Definite(c) => collect([check_config_start_before_end(c)]),
        }
    }
}

impl Validate for ChainIndexingStatusSnapshot {
    fn violations(&self) -> Vec<Violation> {
        match self {
            ChainIndexingStatusSnapshot::Queued(s) => s.config.violations(),
            ChainIndexingStatusSnapshot::Backfill(s) => {
                let mut out = s.config.violations();
                out.extend(collect([
                    check_start_before_latest_indexed(
                        s.config.start_block(),
                        s.latest_indexed_block,
                    ),
                    check_latest_indexed_before_backfill_end(
                        s.latest_indexed_block,
                        s.backfill_end_block,
                    ),
                    check_backfill_end_is_config_end(&s.config, s.backfill_end_block),
                ]));
                out
            }
            ChainIndexingStatusSnapshot::Following(s) => collect([
                check_start_before_latest_indexed(s.config.start_block, s.latest_indexed_block),
                check_latest_indexed_before_latest_known(
                    s.latest_indexed_block,
                    s.latest_known_block,
                ),
            ]),
            ChainIndexingStatusSnapshot::Completed(s) => collect([
                check_config_start_before_end(&s.config),
                check_start_before_latest_indexed(s.config.start_block, s.latest_indexed_block),
                check_latest_indexed_before_config_end(s.latest_indexed_block, &s.config),
            ]),
        }
    }
}

// ─── Omnichain checks ─────────────────────────────────────────────────────────

pub fn check_chains_not_empty(chains: &BTreeMap<ChainId, ChainIndexingStatusSnapshot>) -> Check {
    if chains.is_empty() {
        Err(Violation::new(
            invariants::CHAINS_NOT_EMPTY,
            "an omnichain snapshot must track at least one chain",
        ))
    } else {
        Ok(())
    }
}

pub fn check_omnichain_status_derived(
    status: OmnichainIndexingStatus,
    chains: &BTreeMap<ChainId, ChainIndexingStatusSnapshot>,
) -> Check {
    match OmnichainIndexingStatus::derive(chains.values().map(|c| c.status())) {
        Ok(derived) if derived != status => Err(Violation::new(
            invariants::OMNICHAIN_STATUS_DERIVED,
            format!("omnichainStatus is {status} but the chain statuses imply {derived}"),
        )),
        _ => Ok(()),
    }
}

pub fn check_omnichain_cursor_derived(
    cursor: UnixTimestamp,
    chains: &BTreeMap<ChainId, ChainIndexingStatusSnapshot>,
) -> Check {
    match omnichain::derive_cursor(chains) {
        Some(derived) if derived != cursor => Err(Violation::new(
            invariants::OMNICHAIN_CURSOR_DERIVED,
            format!("omnichainIndexingCursor is {cursor} but the chains imply {derived}"),
        )),
        _ => Ok(()),
    }
}

/// Only meaningful once some chain has started; while every chain is queued
/// the cursor sits at the lowest start timestamp.
pub fn check_omnichain_cursor_before_queued_starts(
    cursor: UnixTimestamp,
    chains: &BTreeMap<ChainId, ChainIndexingStatusSnapshot>,
) -> Check {
    if !chains.values().any(|c| c.status().has_started()) {
        return Ok(());
    }
    match omnichain::lowest_queued_start_timestamp(chains) {
        Some(lowest) if cursor >= lowest => Err(Violation::new(
            invariants::OMNICHAIN_CURSOR_BEFORE_QUEUED_STARTS,
            format!(
                "omnichainIndexingCursor ({cursor}) is not before a queued start ({lowest})"
            ),
        )),
        _ => Ok(()),
    }
}

impl Validate for OmnichainIndexingStatusSnapshot {
    fn violations(&self) -> Vec<Violation> {
        let chains = self.chains();
        if let Err(v) = check_chains_not_empty(chains) {
            return vec![v];
        }

        let mut out: Vec<Violation> = chains
            .iter()
            .flat_map(|(id, chain)| {
                let path = format!("chains[{id}]");
                chain.violations().into_iter().map(move |v| v.within(&path))
            })
            .collect();

        let cursor = self.omnichain_indexing_cursor();
        out.extend(collect([
            check_omnichain_status_derived(self.omnichain_status(), chains),
            check_omnichain_cursor_derived(cursor, chains),
            check_omnichain_cursor_before_queued_starts(cursor, chains),
        ]));
        out
    }
}

// ─── Cross-chain checks ───────────────────────────────────────────────────────

pub fn check_slowest_cursor_matches_omnichain(
    slowest_cursor: UnixTimestamp,
    omnichain: &OmnichainIndexingStatusSnapshot,
) -> Check {
    let expected = omnichain.omnichain_indexing_cursor();
    if slowest_cursor == expected {
        Ok(())
    } else {
        Err(Violation::new(
            invariants::SLOWEST_CURSOR_MATCHES_OMNICHAIN,
            format!("slowestChainIndexingCursor is {slowest_cursor}, expected {expected}"),
        ))
    }
}

pub fn check_snapshot_time_after_cursor(
    snapshot_time: UnixTimestamp,
    slowest_cursor: UnixTimestamp,
) -> Check {
    if snapshot_time >= slowest_cursor {
        Ok(())
    } else {
        Err(Violation::new(
            invariants::SNAPSHOT_TIME_AFTER_CURSOR,
            format!("snapshotTime ({snapshot_time}) is before the cursor ({slowest_cursor})"),
        ))
    }
}

pub fn check_snapshot_time_after_known_blocks(
    snapshot_time: UnixTimestamp,
    omnichain: &OmnichainIndexingStatusSnapshot,
) -> Check {
    match omnichain.highest_known_block_timestamp() {
        Some(highest) if snapshot_time < highest => Err(Violation::new(
            invariants::SNAPSHOT_TIME_AFTER_KNOWN_BLOCKS,
            format!("snapshotTime ({snapshot_time}) is before the highest known block ({highest})"),
        )),
        _ => Ok(()),
    }
}

impl Validate for CrossChainIndexingStatusSnapshot {
    fn violations(&self) -> Vec<Violation> {
        let omnichain = self.omnichain_snapshot();
        let mut out: Vec<Violation> = omnichain
            .violations()
            .into_iter()
            .map(|v| v.within("omnichainSnapshot"))
            .collect();
        let slowest = self.slowest_chain_indexing_cursor();
        let snapshot_time = self.snapshot_time();
        out.extend(collect([
            check_slowest_cursor_matches_omnichain(slowest, omnichain),
            check_snapshot_time_after_cursor(snapshot_time, slowest),
            check_snapshot_time_after_known_blocks(snapshot_time, omnichain),
        ]));
        out
    }
}

// ─── Projection checks ────────────────────────────────────────────────────────

pub fn check_projected_at_after_snapshot_time(
    projected_at: UnixTimestamp,
    snapshot_time: UnixTimestamp,
) -> Check {
    if projected_at >= snapshot_time {
        Ok(())
    } else {
        Err(Violation::new(
            invariants::PROJECTED_AT_AFTER_SNAPSHOT_TIME,
            format!("projectedAt ({projected_at}) is before snapshotTime ({snapshot_time})"),
        ))
    }
}

pub fn check_worst_case_distance_derived(
    worst_case_distance: u64,
    projected_at: UnixTimestamp,
    slowest_cursor: UnixTimestamp,
) -> Check {
    match projected_at.checked_sub(slowest_cursor) {
        Some(expected) if expected == worst_case_distance => Ok(()),
        Some(expected) => Err(Violation::new(
            invariants::WORST_CASE_DISTANCE_DERIVED,
            format!("worstCaseDistance is {worst_case_distance}, expected {expected}"),
        )),
        None => Err(Violation::new(
            invariants::WORST_CASE_DISTANCE_DERIVED,
            format!("projectedAt ({projected_at}) is before the slowest cursor ({slowest_cursor})"),
        )),
    }
}

impl Validate for RealtimeIndexingStatusProjection {
    fn violations(&self) -> Vec<Violation> {
        let snapshot = self.snapshot();
        let mut out: Vec<Violation> = snapshot
            .violations()
            .into_iter()
            .map(|v| v.within("snapshot"))
            .collect();
        out.extend(collect([
            check_projected_at_after_snapshot_time(self.projected_at(), snapshot.snapshot_time()),
            check_worst_case_distance_derived(
                self.worst_case_distance(),
                self.projected_at(),
                snapshot.slowest_chain_indexing_cursor(),
            ),
        ]));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain_status::{
        ChainBackfillSnapshot, ChainCompletedSnapshot, ChainFollowingSnapshot, ChainQueuedSnapshot,
    };
    use crate::config::IndefiniteConfig;

    fn block(number: u64, timestamp: u64) -> BlockRef {
        BlockRef::new(number, timestamp)
    }

    fn definite(start: BlockRef, end: BlockRef) -> DefiniteConfig {
        DefiniteConfig {
            start_block: start,
            end_block: end,
        }
    }

    #[test]
    fn queued_with_inverted_definite_config() {
        let snapshot: ChainIndexingStatusSnapshot = ChainQueuedSnapshot {
            config: definite(block(20, 200), block(10, 100)).into(),
        }
        .into();
        let err = snapshot.validate().unwrap_err();
        assert!(err.names_invariant(invariants::CONFIG_START_BEFORE_END));
    }

    #[test]
    fn backfill_each_invariant_is_named() {
        let config = ChainIndexingConfig::indefinite(block(10, 100));

        let before_start: ChainIndexingStatusSnapshot = ChainBackfillSnapshot {
            config,
            latest_indexed_block: block(5, 50),
            backfill_end_block: block(30, 300),
        }
        .into();
        assert!(before_start
            .validate()
            .unwrap_err()
            .names_invariant(invariants::START_BEFORE_LATEST_INDEXED));

        let past_end: ChainIndexingStatusSnapshot = ChainBackfillSnapshot {
            config,
            latest_indexed_block: block(31, 310),
            backfill_end_block: block(30, 300),
        }
        .into();
        assert!(past_end
            .validate()
            .unwrap_err()
            .names_invariant(invariants::LATEST_INDEXED_BEFORE_BACKFILL_END));

        let wrong_end: ChainIndexingStatusSnapshot = ChainBackfillSnapshot {
            config: definite(block(10, 100), block(40, 400)).into(),
            latest_indexed_block: block(20, 200),
            backfill_end_block: block(30, 300),
        }
        .into();
        assert!(wrong_end
            .validate()
            .unwrap_err()
            .names_invariant(invariants::BACKFILL_END_IS_CONFIG_END));
    }

    #[test]
    fn following_each_invariant_is_named() {
        let config = IndefiniteConfig {
            start_block: block(10, 100),
        };
        let before_start: ChainIndexingStatusSnapshot = ChainFollowingSnapshot {
            config,
            latest_indexed_block: block(9, 90),
            latest_known_block: block(20, 200),
        }
        .into();
        assert!(before_start
            .validate()
            .unwrap_err()
            .names_invariant(invariants::START_BEFORE_LATEST_INDEXED));

        let ahead_of_head: ChainIndexingStatusSnapshot = ChainFollowingSnapshot {
            config,
            latest_indexed_block: block(21, 210),
            latest_known_block: block(20, 200),
        }
        .into();
        assert!(ahead_of_head
            .validate()
            .unwrap_err()
            .names_invariant(invariants::LATEST_INDEXED_BEFORE_LATEST_KNOWN));
    }

    #[test]
    fn completed_each_invariant_is_named() {
        let config = definite(block(10, 100), block(20, 200));
        let past_end: ChainIndexingStatusSnapshot = ChainCompletedSnapshot {
            config,
            latest_indexed_block: block(21, 210),
        }
        .into();
        assert!(past_end
            .validate()
            .unwrap_err()
            .names_invariant(invariants::LATEST_INDEXED_BEFORE_CONFIG_END));

        let before_start: ChainIndexingStatusSnapshot = ChainCompletedSnapshot {
            config,
            latest_indexed_block: block(9, 90),
        }
        .into();
        assert!(before_start
            .validate()
            .unwrap_err()
            .names_invariant(invariants::START_BEFORE_LATEST_INDEXED));
    }

    #[test]
    fn all_violations_are_collected() {
        // indexed block before the start AND past the backfill end (by timestamp)
        let snapshot: ChainIndexingStatusSnapshot = ChainBackfillSnapshot {
            config: ChainIndexingConfig::indefinite(block(10, 100)),
            latest_indexed_block: block(5, 400),
            backfill_end_block: block(30, 300),
        }
        .into();
        let err = snapshot.validate().unwrap_err();
        assert_eq!(err.violations().len(), 2);
        assert!(err.names_invariant(invariants::START_BEFORE_LATEST_INDEXED));
        assert!(err.names_invariant(invariants::LATEST_INDEXED_BEFORE_BACKFILL_END));
    }

    #[test]
    fn config_type_check_only_constrains_terminal_states() {
        assert!(check_config_type_matches_status(
            ChainStatus::Following,
            ChainIndexingConfigType::Definite
        )
        .is_err());
        assert!(check_config_type_matches_status(
            ChainStatus::Completed,
            ChainIndexingConfigType::Indefinite
        )
        .is_err());
        assert!(check_config_type_matches_status(
            ChainStatus::Backfill,
            ChainIndexingConfigType::Definite
        )
        .is_ok());
    }

    #[test]
    fn worst_case_distance_check() {
        assert!(check_worst_case_distance_derived(50, 950, 900).is_ok());
        assert!(check_worst_case_distance_derived(40, 950, 900).is_err());
        assert!(check_worst_case_distance_derived(0, 800, 900).is_err());
    }
}
