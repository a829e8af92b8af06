//! Cross-chain indexing status — an omnichain snapshot under an explicit
//! indexing strategy, stamped with the time it was taken.

use std::fmt;

use crate::block::UnixTimestamp;
use crate::clock::dominate;
use crate::omnichain::OmnichainIndexingStatusSnapshot;

/// How events from multiple chains are ordered by the indexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrossChainIndexingStrategy {
    /// Events of all chains are processed in one global timestamp order.
    Omnichain,
}

impl CrossChainIndexingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Omnichain => "omnichain",
        }
    }
}

impl fmt::Display for CrossChainIndexingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot taken under the omnichain strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OmnichainStrategySnapshot {
    pub(crate) slowest_chain_indexing_cursor: UnixTimestamp,
    pub(crate) snapshot_time: UnixTimestamp,
    pub(crate) omnichain_snapshot: OmnichainIndexingStatusSnapshot,
}

impl OmnichainStrategySnapshot {
    pub fn slowest_chain_indexing_cursor(&self) -> UnixTimestamp {
        self.slowest_chain_indexing_cursor
    }

    pub fn snapshot_time(&self) -> UnixTimestamp {
        self.snapshot_time
    }

    pub fn omnichain_snapshot(&self) -> &OmnichainIndexingStatusSnapshot {
        &self.omnichain_snapshot
    }
}

/// Indexing status across all chains, one variant per strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrossChainIndexingStatusSnapshot {
    Omnichain(OmnichainStrategySnapshot),
}

impl CrossChainIndexingStatusSnapshot {
    /// Wrap an omnichain snapshot taken at `snapshot_time`.
    ///
    /// `snapshot_time` is raised to the highest timestamp the snapshot
    /// knows about (and to its cursor) when the caller's clock lags the
    /// chains' RPC sources. Never fails.
    pub fn omnichain(
        omnichain_snapshot: OmnichainIndexingStatusSnapshot,
        snapshot_time: UnixTimestamp,
    ) -> Self {
        let slowest_chain_indexing_cursor = omnichain_snapshot.omnichain_indexing_cursor();
        let lower_bound = omnichain_snapshot
            .highest_known_block_timestamp()
            .unwrap_or_default()
            .max(slowest_chain_indexing_cursor);

        Self::Omnichain(OmnichainStrategySnapshot {
            slowest_chain_indexing_cursor,
            snapshot_time: dominate(snapshot_time, lower_bound, "snapshotTime"),
            omnichain_snapshot,
        })
    }

    pub fn strategy(&self) -> CrossChainIndexingStrategy {
        match self {
            Self::Omnichain(_) => CrossChainIndexingStrategy::Omnichain,
        }
    }

    pub fn slowest_chain_indexing_cursor(&self) -> UnixTimestamp {
        match self {
            Self::Omnichain(s) => s.slowest_chain_indexing_cursor,
        }
    }

    pub fn snapshot_time(&self) -> UnixTimestamp {
        match self {
            Self::Omnichain(s) => s.snapshot_time,
        }
    }

    pub fn omnichain_snapshot(&self) -> &OmnichainIndexingStatusSnapshot {
        match self {
            Self::Omnichain(s) => &s.omnichain_snapshot,
        }
    }
}
