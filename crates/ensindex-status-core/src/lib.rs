//! ensindex-status-core — the indexing status model for multi-chain ENS indexing.
//!
//! # Architecture
//!
//! ```text
//! per-chain facts (indexer + RPC)
//!        │
//!        ▼
//! build_chain_snapshot                         → ChainIndexingStatusSnapshot
//!        │                                       (Queued | Backfill | Following | Completed)
//!        ▼
//! OmnichainIndexingStatusSnapshot::aggregate   → omnichain status + indexing cursor
//!        │
//!        ▼
//! CrossChainIndexingStatusSnapshot::omnichain  → strategy tag + snapshotTime
//!        │
//!        ▼
//! RealtimeIndexingStatusProjection::project    → worst case distance from realtime
//! ```
//!
//! Every value is immutable and re-checked by the [`validate`] layer, which
//! reports all broken invariants at once.

pub mod block;
pub mod builder;
pub mod chain;
pub mod chain_status;
pub mod clock;
pub mod config;
pub mod cross_chain;
pub mod error;
pub mod omnichain;
pub mod parts;
pub mod projection;
pub mod validate;

pub use block::{BlockRef, DurationSecs, UnixTimestamp};
pub use builder::{build_chain_snapshot, build_chain_snapshots, ChainFacts};
pub use chain::ChainId;
pub use chain_status::{
    ChainBackfillSnapshot, ChainCompletedSnapshot, ChainFollowingSnapshot,
    ChainIndexingStatusSnapshot, ChainQueuedSnapshot, ChainStatus,
};
pub use config::{ChainIndexingConfig, ChainIndexingConfigType, DefiniteConfig, IndefiniteConfig};
pub use cross_chain::{
    CrossChainIndexingStatusSnapshot, CrossChainIndexingStrategy, OmnichainStrategySnapshot,
};
pub use error::{StatusError, Violation};
pub use omnichain::{OmnichainIndexingStatus, OmnichainIndexingStatusSnapshot};
pub use parts::{CrossChainSnapshotParts, OmnichainSnapshotParts, ProjectionParts};
pub use projection::{RealtimeGapCheck, RealtimeIndexingStatusProjection, DEFAULT_GAP_THRESHOLD};
pub use validate::Validate;
