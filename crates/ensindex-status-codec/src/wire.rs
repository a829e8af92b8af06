//! Serialized (JSON) shapes of the status model.
//!
//! Field names are camelCase, discriminants are carried in `chainStatus`,
//! `configType` and `strategy` tags, and chain maps are keyed by the
//! decimal chain id. Unknown fields are rejected, so a field that is
//! forbidden for a given chain status fails to parse.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SerializedBlockRef {
    pub number: u64,
    pub timestamp: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializedConfigType {
    Indefinite,
    Definite,
}

/// `endBlock` is `null` for indefinite configs and required for definite ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SerializedChainIndexingConfig {
    pub config_type: SerializedConfigType,
    pub start_block: SerializedBlockRef,
    #[serde(default)]
    pub end_block: Option<SerializedBlockRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "chainStatus", deny_unknown_fields)]
pub enum SerializedChainIndexingStatusSnapshot {
    Queued {
        config: SerializedChainIndexingConfig,
    },
    #[serde(rename_all = "camelCase")]
    Backfill {
        config: SerializedChainIndexingConfig,
        latest_indexed_block: SerializedBlockRef,
        backfill_end_block: SerializedBlockRef,
    },
    #[serde(rename_all = "camelCase")]
    Following {
        config: SerializedChainIndexingConfig,
        latest_indexed_block: SerializedBlockRef,
        latest_known_block: SerializedBlockRef,
    },
    #[serde(rename_all = "camelCase")]
    Completed {
        config: SerializedChainIndexingConfig,
        latest_indexed_block: SerializedBlockRef,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SerializedOmnichainIndexingStatus {
    Unstarted,
    Backfill,
    Following,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SerializedOmnichainIndexingStatusSnapshot {
    pub omnichain_status: SerializedOmnichainIndexingStatus,
    pub chains: BTreeMap<String, SerializedChainIndexingStatusSnapshot>,
    pub omnichain_indexing_cursor: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase", deny_unknown_fields)]
pub enum SerializedCrossChainIndexingStatusSnapshot {
    #[serde(rename_all = "camelCase")]
    Omnichain {
        slowest_chain_indexing_cursor: u64,
        snapshot_time: u64,
        omnichain_snapshot: SerializedOmnichainIndexingStatusSnapshot,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SerializedRealtimeIndexingStatusProjection {
    pub projected_at: u64,
    pub worst_case_distance: u64,
    pub snapshot: SerializedCrossChainIndexingStatusSnapshot,
}

/// Raw per-chain facts as written by the indexer and the RPC prober.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SerializedChainFacts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<SerializedChainIndexingConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_indexed_block: Option<SerializedBlockRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_known_block: Option<SerializedBlockRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backfill_end_block: Option<SerializedBlockRef>,
}

/// Facts for every tracked chain, keyed by decimal chain id.
pub type SerializedChainFactsMap = BTreeMap<String, SerializedChainFacts>;
