//! Unvalidated building blocks for status values supplied from outside
//! (decoded wire payloads, stored snapshots).
//!
//! Converting parts with `TryFrom` assembles the whole value and validates
//! it once from the top, so a nested inconsistency and a top-level one are
//! reported together.

use std::collections::BTreeMap;

use crate::block::{DurationSecs, UnixTimestamp};
use crate::chain::ChainId;
use crate::chain_status::ChainIndexingStatusSnapshot;
use crate::cross_chain::{
    CrossChainIndexingStatusSnapshot, CrossChainIndexingStrategy, OmnichainStrategySnapshot,
};
use crate::error::StatusError;
use crate::omnichain::{OmnichainIndexingStatus, OmnichainIndexingStatusSnapshot};
use crate::projection::RealtimeIndexingStatusProjection;
use crate::validate::Validate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OmnichainSnapshotParts {
    pub omnichain_status: OmnichainIndexingStatus,
    pub chains: BTreeMap<ChainId, ChainIndexingStatusSnapshot>,
    pub omnichain_indexing_cursor: UnixTimestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossChainSnapshotParts {
    pub strategy: CrossChainIndexingStrategy,
    pub slowest_chain_indexing_cursor: UnixTimestamp,
    pub snapshot_time: UnixTimestamp,
    pub omnichain_snapshot: OmnichainSnapshotParts,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionParts {
    pub projected_at: UnixTimestamp,
    pub worst_case_distance: DurationSecs,
    pub snapshot: CrossChainSnapshotParts,
}

impl OmnichainSnapshotParts {
    fn assemble(self) -> OmnichainIndexingStatusSnapshot {
        OmnichainIndexingStatusSnapshot {
            omnichain_status: self.omnichain_status,
            chains: self.chains,
            omnichain_indexing_cursor: self.omnichain_indexing_cursor,
        }
    }
}

impl CrossChainSnapshotParts {
    fn assemble(self) -> CrossChainIndexingStatusSnapshot {
        let omnichain_snapshot = self.omnichain_snapshot.assemble();
        match self.strategy {
            CrossChainIndexingStrategy::Omnichain => {
                CrossChainIndexingStatusSnapshot::Omnichain(OmnichainStrategySnapshot {
                    slowest_chain_indexing_cursor: self.slowest_chain_indexing_cursor,
                    snapshot_time: self.snapshot_time,
                    omnichain_snapshot,
                })
            }
        }
    }
}

impl ProjectionParts {
    fn assemble(self) -> RealtimeIndexingStatusProjection {
        RealtimeIndexingStatusProjection {
            projected_at: self.projected_at,
            worst_case_distance: self.worst_case_distance,
            snapshot: self.snapshot.assemble(),
        }
    }
}

impl TryFrom<OmnichainSnapshotParts> for OmnichainIndexingStatusSnapshot {
    type Error = StatusError;

    fn try_from(parts: OmnichainSnapshotParts) -> Result<Self, Self::Error> {
        let snapshot = parts.assemble();
        snapshot.validate()?;
        Ok(snapshot)
    }
}

impl TryFrom<CrossChainSnapshotParts> for CrossChainIndexingStatusSnapshot {
    type Error = StatusError;

    fn try_from(parts: CrossChainSnapshotParts) -> Result<Self, Self::Error> {
        let snapshot = parts.assemble();
        snapshot.validate()?;
        Ok(snapshot)
    }
}

impl TryFrom<ProjectionParts> for RealtimeIndexingStatusProjection {
    type Error = StatusError;

    fn try_from(parts: ProjectionParts) -> Result<Self, Self::Error> {
        let projection = parts.assemble();
        projection.validate()?;
        Ok(projection)
    }
}

impl From<&OmnichainIndexingStatusSnapshot> for OmnichainSnapshotParts {
    fn from(snapshot: &OmnichainIndexingStatusSnapshot) -> Self {
        Self {
            omnichain_status: snapshot.omnichain_status(),
            chains: snapshot.chains().clone(),
            omnichain_indexing_cursor: snapshot.omnichain_indexing_cursor(),
        }
    }
}

impl From<&CrossChainIndexingStatusSnapshot> for CrossChainSnapshotParts {
    fn from(snapshot: &CrossChainIndexingStatusSnapshot) -> Self {
        Self {
            strategy: snapshot.strategy(),
            slowest_chain_indexing_cursor: snapshot.slowest_chain_indexing_cursor(),
            snapshot_time: snapshot.snapshot_time(),
            omnichain_snapshot: snapshot.omnichain_snapshot().into(),
        }
    }
}

impl From<&RealtimeIndexingStatusProjection> for ProjectionParts {
    fn from(projection: &RealtimeIndexingStatusProjection) -> Self {
        Self {
            projected_at: projection.projected_at(),
            worst_case_distance: projection.worst_case_distance(),
            snapshot: projection.snapshot().into(),
        }
    }
}
