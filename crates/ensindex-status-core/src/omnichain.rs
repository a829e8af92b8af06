//! Omnichain aggregation — one status and one cursor over every tracked chain.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::block::UnixTimestamp;
use crate::chain::ChainId;
use crate::chain_status::{ChainIndexingStatusSnapshot, ChainStatus};
use crate::error::StatusError;
use crate::validate::Validate;

/// Aggregate status of all tracked chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OmnichainIndexingStatus {
    /// Every chain is queued.
    Unstarted,
    /// Work remains and no chain is following the chain head.
    Backfill,
    /// At least one chain is following the chain head.
    Following,
    /// Every chain has completed.
    Completed,
}

impl OmnichainIndexingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unstarted => "Unstarted",
            Self::Backfill => "Backfill",
            Self::Following => "Following",
            Self::Completed => "Completed",
        }
    }

    /// Derive the omnichain status from the chain statuses.
    ///
    /// Precedence: any Following → Following; any Backfill → Backfill;
    /// all Completed → Completed; all Queued → Unstarted; a mix of only
    /// Queued and Completed → Backfill.
    pub fn derive(statuses: impl IntoIterator<Item = ChainStatus>) -> Result<Self, StatusError> {
        let mut count = 0usize;
        let mut any_following = false;
        let mut any_backfill = false;
        let mut all_completed = true;
        let mut all_queued = true;

        for status in statuses {
            count += 1;
            match status {
                ChainStatus::Following => any_following = true,
                ChainStatus::Backfill => any_backfill = true,
                _ => {}
            }
            all_completed &= status == ChainStatus::Completed;
            all_queued &= status == ChainStatus::Queued;
        }

        if count == 0 {
            return Err(StatusError::EmptyChainSet);
        }

        let derived = if any_following {
            Self::Following
        } else if any_backfill {
            Self::Backfill
        } else if all_completed {
            Self::Completed
        } else if all_queued {
            Self::Unstarted
        } else {
            Self::Backfill
        };
        Ok(derived)
    }
}

impl fmt::Display for OmnichainIndexingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Omnichain indexing cursor for a set of chains.
///
/// The highest `latestIndexedBlock.timestamp` among started chains, or the
/// lowest start block timestamp when nothing has started. `None` for an
/// empty set.
pub fn derive_cursor(
    chains: &BTreeMap<ChainId, ChainIndexingStatusSnapshot>,
) -> Option<UnixTimestamp> {
    chains
        .values()
        .filter_map(|c| c.latest_indexed_block())
        .map(|b| b.timestamp)
        .max()
        .or_else(|| chains.values().map(|c| c.start_block().timestamp).min())
}

/// Lowest start block timestamp among queued chains.
pub fn lowest_queued_start_timestamp(
    chains: &BTreeMap<ChainId, ChainIndexingStatusSnapshot>,
) -> Option<UnixTimestamp> {
    chains
        .values()
        .filter(|c| c.status() == ChainStatus::Queued)
        .map(|c| c.start_block().timestamp)
        .min()
}

/// Indexing status of all tracked chains at one instant.
///
/// Only obtainable through [`aggregate`](Self::aggregate) or by validating
/// [`OmnichainSnapshotParts`](crate::parts::OmnichainSnapshotParts), so the
/// status and cursor are always consistent with `chains`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OmnichainIndexingStatusSnapshot {
    pub(crate) omnichain_status: OmnichainIndexingStatus,
    pub(crate) chains: BTreeMap<ChainId, ChainIndexingStatusSnapshot>,
    pub(crate) omnichain_indexing_cursor: UnixTimestamp,
}

impl OmnichainIndexingStatusSnapshot {
    /// Derive status and cursor from the per-chain snapshots.
    ///
    /// Fails with [`StatusError::EmptyChainSet`] for an empty map and with
    /// [`StatusError::InvariantViolation`] if the chains are inconsistent.
    pub fn aggregate(
        chains: BTreeMap<ChainId, ChainIndexingStatusSnapshot>,
    ) -> Result<Self, StatusError> {
        let omnichain_status =
            OmnichainIndexingStatus::derive(chains.values().map(|c| c.status()))?;
        let omnichain_indexing_cursor = derive_cursor(&chains).ok_or(StatusError::EmptyChainSet)?;

        let snapshot = Self {
            omnichain_status,
            chains,
            omnichain_indexing_cursor,
        };
        snapshot.validate()?;

        debug!(
            status = %snapshot.omnichain_status,
            cursor = snapshot.omnichain_indexing_cursor,
            chains = snapshot.chains.len(),
            "aggregated omnichain indexing status"
        );
        Ok(snapshot)
    }

    pub fn omnichain_status(&self) -> OmnichainIndexingStatus {
        self.omnichain_status
    }

    pub fn chains(&self) -> &BTreeMap<ChainId, ChainIndexingStatusSnapshot> {
        &self.chains
    }

    pub fn omnichain_indexing_cursor(&self) -> UnixTimestamp {
        self.omnichain_indexing_cursor
    }

    /// Lowest `config.startBlock.timestamp` over all chains.
    pub fn lowest_start_block_timestamp(&self) -> Option<UnixTimestamp> {
        self.chains.values().map(|c| c.start_block().timestamp).min()
    }

    /// Highest timestamp any chain knows about (see
    /// [`ChainIndexingStatusSnapshot::highest_known_block`]).
    pub fn highest_known_block_timestamp(&self) -> Option<UnixTimestamp> {
        self.chains
            .values()
            .map(|c| c.highest_known_block().timestamp)
            .max()
    }
}
