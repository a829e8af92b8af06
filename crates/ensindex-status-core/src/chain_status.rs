//! Per-chain indexing status snapshots.
//!
//! Each state only carries the fields that are meaningful for it, so a
//! `Queued` chain has no indexed block and a `Completed` chain has no
//! known-head block. `Following` requires an indefinite config and
//! `Completed` a definite one; both are enforced by the field types.

use std::fmt;

use crate::block::BlockRef;
use crate::config::{ChainIndexingConfig, DefiniteConfig, IndefiniteConfig};

/// Discriminant of [`ChainIndexingStatusSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainStatus {
    /// Config registered, nothing indexed yet.
    Queued,
    /// Catching up towards the backfill end block.
    Backfill,
    /// Caught up and processing new blocks as they arrive.
    Following,
    /// Reached the end block of a definite config.
    Completed,
}

impl ChainStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "Queued",
            Self::Backfill => "Backfill",
            Self::Following => "Following",
            Self::Completed => "Completed",
        }
    }

    /// Returns `true` once at least one block has been indexed.
    pub fn has_started(&self) -> bool {
        !matches!(self, Self::Queued)
    }
}

impl fmt::Display for ChainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainQueuedSnapshot {
    pub config: ChainIndexingConfig,
}

/// Invariants: `config.startBlock <= latestIndexedBlock <= backfillEndBlock`,
/// and `backfillEndBlock == config.endBlock` for definite configs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainBackfillSnapshot {
    pub config: ChainIndexingConfig,
    pub latest_indexed_block: BlockRef,
    pub backfill_end_block: BlockRef,
}

/// Invariant: `config.startBlock <= latestIndexedBlock <= latestKnownBlock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainFollowingSnapshot {
    pub config: IndefiniteConfig,
    pub latest_indexed_block: BlockRef,
    pub latest_known_block: BlockRef,
}

/// Invariant: `config.startBlock <= latestIndexedBlock <= config.endBlock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainCompletedSnapshot {
    pub config: DefiniteConfig,
    pub latest_indexed_block: BlockRef,
}

/// Indexing status of one chain at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainIndexingStatusSnapshot {
    Queued(ChainQueuedSnapshot),
    Backfill(ChainBackfillSnapshot),
    Following(ChainFollowingSnapshot),
    Completed(ChainCompletedSnapshot),
}

impl ChainIndexingStatusSnapshot {
    pub fn status(&self) -> ChainStatus {
        match self {
            Self::Queued(_) => ChainStatus::Queued,
            Self::Backfill(_) => ChainStatus::Backfill,
            Self::Following(_) => ChainStatus::Following,
            Self::Completed(_) => ChainStatus::Completed,
        }
    }

    pub fn config(&self) -> ChainIndexingConfig {
        match self {
            Self::Queued(s) => s.config,
            Self::Backfill(s) => s.config,
            Self::Following(s) => s.config.into(),
            Self::Completed(s) => s.config.into(),
        }
    }

    pub fn start_block(&self) -> BlockRef {
        self.config().start_block()
    }

    /// The most recently indexed block, `None` while queued.
    pub fn latest_indexed_block(&self) -> Option<BlockRef> {
        match self {
            Self::Queued(_) => None,
            Self::Backfill(s) => Some(s.latest_indexed_block),
            Self::Following(s) => Some(s.latest_indexed_block),
            Self::Completed(s) => Some(s.latest_indexed_block),
        }
    }

    /// The furthest block this snapshot knows about.
    ///
    /// - Queued: the config end block, or the start block if indefinite
    /// - Backfill: the backfill end block
    /// - Following: the latest known block
    /// - Completed: the config end block
    pub fn highest_known_block(&self) -> BlockRef {
        match self {
            Self::Queued(s) => s.config.end_block().unwrap_or(s.config.start_block()),
            Self::Backfill(s) => s.backfill_end_block,
            Self::Following(s) => s.latest_known_block,
            Self::Completed(s) => s.config.end_block,
        }
    }
}

impl From<ChainQueuedSnapshot> for ChainIndexingStatusSnapshot {
    fn from(s: ChainQueuedSnapshot) -> Self {
        Self::Queued(s)
    }
}

impl From<ChainBackfillSnapshot> for ChainIndexingStatusSnapshot {
    fn from(s: ChainBackfillSnapshot) -> Self {
        Self::Backfill(s)
    }
}

impl From<ChainFollowingSnapshot> for ChainIndexingStatusSnapshot {
    fn from(s: ChainFollowingSnapshot) -> Self {
        Self::Following(s)
    }
}

impl From<ChainCompletedSnapshot> for ChainIndexingStatusSnapshot {
    fn from(s: ChainCompletedSnapshot) -> Self {
        Self::Completed(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(number: u64) -> BlockRef {
        BlockRef::new(number, number * 12)
    }

    #[test]
    fn highest_known_block_per_state() {
        let queued_indefinite: ChainIndexingStatusSnapshot = ChainQueuedSnapshot {
            config: ChainIndexingConfig::indefinite(block(10)),
        }
        .into();
        assert_eq!(queued_indefinite.highest_known_block(), block(10));

        let definite = DefiniteConfig {
            start_block: block(10),
            end_block: block(50),
        };
        let queued_definite: ChainIndexingStatusSnapshot = ChainQueuedSnapshot {
            config: definite.into(),
        }
        .into();
        assert_eq!(queued_definite.highest_known_block(), block(50));

        let backfill: ChainIndexingStatusSnapshot = ChainBackfillSnapshot {
            config: ChainIndexingConfig::indefinite(block(10)),
            latest_indexed_block: block(20),
            backfill_end_block: block(30),
        }
        .into();
        assert_eq!(backfill.highest_known_block(), block(30));

        let following: ChainIndexingStatusSnapshot = ChainFollowingSnapshot {
            config: IndefiniteConfig {
                start_block: block(10),
            },
            latest_indexed_block: block(40),
            latest_known_block: block(42),
        }
        .into();
        assert_eq!(following.highest_known_block(), block(42));

        let completed: ChainIndexingStatusSnapshot = ChainCompletedSnapshot {
            config: definite,
            latest_indexed_block: block(50),
        }
        .into();
        assert_eq!(completed.highest_known_block(), block(50));
        assert_eq!(completed.status(), ChainStatus::Completed);
    }

    #[test]
    fn queued_has_no_indexed_block() {
        let queued: ChainIndexingStatusSnapshot = ChainQueuedSnapshot {
            config: ChainIndexingConfig::indefinite(block(1)),
        }
        .into();
        assert_eq!(queued.latest_indexed_block(), None);
        assert!(!queued.status().has_started());
    }
}
