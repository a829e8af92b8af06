//! Conversion between the domain model and its serialized shapes.
//!
//! Encoding never fails. Decoding distinguishes malformed input
//! ([`StatusError::Deserialization`]) from well-formed input whose values
//! break the model ([`StatusError::InvariantViolation`]), and re-runs the
//! full validator before handing out a domain value.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use ensindex_status_core::validate::{check_config_type_matches_status, into_result};
use ensindex_status_core::{
    BlockRef, ChainBackfillSnapshot, ChainCompletedSnapshot, ChainFacts, ChainFollowingSnapshot,
    ChainId, ChainIndexingConfig, ChainIndexingStatusSnapshot, ChainQueuedSnapshot,
    CrossChainIndexingStatusSnapshot, CrossChainIndexingStrategy, CrossChainSnapshotParts,
    DefiniteConfig, IndefiniteConfig, OmnichainIndexingStatus, OmnichainIndexingStatusSnapshot,
    OmnichainSnapshotParts, ProjectionParts, RealtimeIndexingStatusProjection, StatusError,
    Validate, Violation,
};

use crate::wire::*;

/// A domain value with a serialized counterpart.
pub trait WireCodec: Sized {
    type Wire: Serialize + DeserializeOwned;

    fn to_wire(&self) -> Self::Wire;

    /// Decode and validate.
    fn from_wire(wire: Self::Wire) -> Result<Self, StatusError>;

    fn to_json_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self.to_wire())
    }

    fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.to_wire())
    }

    fn from_json_value(value: serde_json::Value) -> Result<Self, StatusError> {
        let wire = serde_json::from_value(value).map_err(StatusError::deserialization)?;
        Self::from_wire(wire)
    }

    fn from_json_str(json: &str) -> Result<Self, StatusError> {
        let wire = serde_json::from_str(json).map_err(StatusError::deserialization)?;
        Self::from_wire(wire)
    }
}

pub fn serialize<T: WireCodec>(value: &T) -> T::Wire {
    value.to_wire()
}

pub fn deserialize<T: WireCodec>(wire: T::Wire) -> Result<T, StatusError> {
    T::from_wire(wire)
}

// ─── Shared helpers ───────────────────────────────────────────────────────────

/// Prefix every reported violation with `prefix`; other errors pass through.
fn nest(err: StatusError, prefix: &str) -> StatusError {
    match err {
        StatusError::InvariantViolation { details } => StatusError::InvariantViolation {
            details: details.into_iter().map(|v| v.within(prefix)).collect(),
        },
        other => other,
    }
}

fn parse_chain_key(key: &str) -> Result<ChainId, StatusError> {
    key.parse()
        .map_err(|err| StatusError::deserialization(format!("chains[{key}]: {err}")))
}

fn chain_key(chain_id: ChainId) -> String {
    chain_id.to_string()
}

/// Decode a chain map. Malformed keys or entries fail immediately; value
/// errors are collected per chain and returned next to the decoded entries.
///
/// Only canonical decimal keys parse, so distinct keys are distinct chains.
fn decode_chain_map<W, T>(
    wire: BTreeMap<String, W>,
    mut decode: impl FnMut(W) -> Result<T, StatusError>,
) -> Result<(BTreeMap<ChainId, T>, Vec<Violation>), StatusError> {
    let mut decoded = BTreeMap::new();
    let mut violations = Vec::new();

    for (key, entry) in wire {
        let chain_id = parse_chain_key(&key)?;
        match decode(entry) {
            Ok(value) => {
                decoded.insert(chain_id, value);
            }
            Err(StatusError::InvariantViolation { details }) => {
                let prefix = chain_path(chain_id);
                violations.extend(details.into_iter().map(|v| v.within(&prefix)));
            }
            Err(StatusError::Deserialization { reason }) => {
                return Err(StatusError::deserialization(format!("chains[{key}]: {reason}")))
            }
            Err(other) => return Err(other),
        }
    }

    Ok((decoded, violations))
}

fn chain_path(chain_id: ChainId) -> String {
    format!("chains[{chain_id}]")
}

// ─── Blocks and configs ───────────────────────────────────────────────────────

impl From<BlockRef> for SerializedBlockRef {
    fn from(block: BlockRef) -> Self {
        Self {
            number: block.number,
            timestamp: block.timestamp,
        }
    }
}

impl From<SerializedBlockRef> for BlockRef {
    fn from(block: SerializedBlockRef) -> Self {
        BlockRef::new(block.number, block.timestamp)
    }
}

impl WireCodec for BlockRef {
    type Wire = SerializedBlockRef;

    fn to_wire(&self) -> Self::Wire {
        (*self).into()
    }

    fn from_wire(wire: Self::Wire) -> Result<Self, StatusError> {
        Ok(wire.into())
    }
}

/// Shape-only decode; ordering is checked by the caller's validator.
fn decode_config(
    wire: SerializedChainIndexingConfig,
) -> Result<ChainIndexingConfig, StatusError> {
    let start_block = wire.start_block.into();
    match (wire.config_type, wire.end_block) {
        (SerializedConfigType::Indefinite, None) => {
            Ok(ChainIndexingConfig::Indefinite(IndefiniteConfig { start_block }))
        }
        (SerializedConfigType::Indefinite, Some(_)) => Err(StatusError::deserialization(
            "an indefinite config must have a null endBlock",
        )),
        (SerializedConfigType::Definite, Some(end_block)) => {
            Ok(ChainIndexingConfig::Definite(DefiniteConfig {
                start_block,
                end_block: end_block.into(),
            }))
        }
        (SerializedConfigType::Definite, None) => Err(StatusError::deserialization(
            "a definite config requires an endBlock",
        )),
    }
}

impl WireCodec for ChainIndexingConfig {
    type Wire = SerializedChainIndexingConfig;

    fn to_wire(&self) -> Self::Wire {
        match self {
            ChainIndexingConfig::Indefinite(c) => SerializedChainIndexingConfig {
                config_type: SerializedConfigType::Indefinite,
                start_block: c.start_block.into(),
                end_block: None,
            },
            ChainIndexingConfig::Definite(c) => SerializedChainIndexingConfig {
                config_type: SerializedConfigType::Definite,
                start_block: c.start_block.into(),
                end_block: Some(c.end_block.into()),
            },
        }
    }

    fn from_wire(wire: Self::Wire) -> Result<Self, StatusError> {
        let config = decode_config(wire)?;
        config.validate()?;
        Ok(config)
    }
}

// ─── Chain snapshots ──────────────────────────────────────────────────────────

/// A chain snapshot as read from the wire, plus the violations its domain
/// value cannot express.
///
/// A `Following` chain with a definite config or a `Completed` chain with an
/// indefinite one has no domain representation. It is decoded with a
/// stand-in config so that the chain ordering checks and every check above
/// the chain still run on the wire numbers.
struct DecodedChain {
    snapshot: ChainIndexingStatusSnapshot,
    unrepresentable: Vec<Violation>,
}

impl DecodedChain {
    fn exact(snapshot: ChainIndexingStatusSnapshot) -> Self {
        Self {
            snapshot,
            unrepresentable: Vec::new(),
        }
    }

    fn mismatched(snapshot: ChainIndexingStatusSnapshot, config: &ChainIndexingConfig) -> Self {
        let mut unrepresentable = config.violations();
        unrepresentable.extend(
            check_config_type_matches_status(snapshot.status(), config.config_type()).err(),
        );
        Self {
            snapshot,
            unrepresentable,
        }
    }

    /// Every violation of this chain, unrepresentable ones first.
    fn violations(&self) -> Vec<Violation> {
        let mut out = self.unrepresentable.clone();
        out.extend(self.snapshot.violations());
        out
    }
}

/// Shape decode; ordering is checked by the caller's validator.
fn decode_chain_snapshot(
    wire: SerializedChainIndexingStatusSnapshot,
) -> Result<DecodedChain, StatusError> {
    let decoded = match wire {
        SerializedChainIndexingStatusSnapshot::Queued { config } => DecodedChain::exact(
            ChainQueuedSnapshot {
                config: decode_config(config)?,
            }
            .into(),
        ),
        SerializedChainIndexingStatusSnapshot::Backfill {
            config,
            latest_indexed_block,
            backfill_end_block,
        } => DecodedChain::exact(
            ChainBackfillSnapshot {
                config: decode_config(config)?,
                latest_indexed_block: latest_indexed_block.into(),
                backfill_end_block: backfill_end_block.into(),
            }
            .into(),
        ),
        SerializedChainIndexingStatusSnapshot::Following {
            config,
            latest_indexed_block,
            latest_known_block,
        } => {
            let config = decode_config(config)?;
            let snapshot = ChainFollowingSnapshot {
                config: IndefiniteConfig {
                    start_block: config.start_block(),
                },
                latest_indexed_block: latest_indexed_block.into(),
                latest_known_block: latest_known_block.into(),
            }
            .into();
            match config {
                ChainIndexingConfig::Indefinite(_) => DecodedChain::exact(snapshot),
                ChainIndexingConfig::Definite(_) => DecodedChain::mismatched(snapshot, &config),
            }
        }
        SerializedChainIndexingStatusSnapshot::Completed {
            config,
            latest_indexed_block,
        } => {
            let latest_indexed_block: BlockRef = latest_indexed_block.into();
            match decode_config(config)? {
                ChainIndexingConfig::Definite(definite) => DecodedChain::exact(
                    ChainCompletedSnapshot {
                        config: definite,
                        latest_indexed_block,
                    }
                    .into(),
                ),
                config @ ChainIndexingConfig::Indefinite(_) => {
                    // The stand-in end block bounds both start and latest
                    // indexed block, so only the wire's own ordering is checked.
                    let start_block = config.start_block();
                    let end_block = BlockRef::new(
                        start_block.number.max(latest_indexed_block.number),
                        start_block.timestamp.max(latest_indexed_block.timestamp),
                    );
                    let snapshot = ChainCompletedSnapshot {
                        config: DefiniteConfig {
                            start_block,
                            end_block,
                        },
                        latest_indexed_block,
                    }
                    .into();
                    DecodedChain::mismatched(snapshot, &config)
                }
            }
        }
    };
    Ok(decoded)
}

/// Merge violations found while decoding into the result of validating the
/// assembled value.
fn with_decode_violations<T>(
    result: Result<T, StatusError>,
    mut decode_violations: Vec<Violation>,
) -> Result<T, StatusError> {
    if decode_violations.is_empty() {
        return result;
    }
    match result {
        Ok(_) => Err(StatusError::InvariantViolation {
            details: decode_violations,
        }),
        Err(StatusError::InvariantViolation { details }) => {
            decode_violations.extend(details);
            Err(StatusError::InvariantViolation {
                details: decode_violations,
            })
        }
        Err(other) => Err(other),
    }
}

impl WireCodec for ChainIndexingStatusSnapshot {
    type Wire = SerializedChainIndexingStatusSnapshot;

    fn to_wire(&self) -> Self::Wire {
        match self {
            ChainIndexingStatusSnapshot::Queued(s) => {
                SerializedChainIndexingStatusSnapshot::Queued {
                    config: s.config.to_wire(),
                }
            }
            ChainIndexingStatusSnapshot::Backfill(s) => {
                SerializedChainIndexingStatusSnapshot::Backfill {
                    config: s.config.to_wire(),
                    latest_indexed_block: s.latest_indexed_block.into(),
                    backfill_end_block: s.backfill_end_block.into(),
                }
            }
            ChainIndexingStatusSnapshot::Following(s) => {
                SerializedChainIndexingStatusSnapshot::Following {
                    config: ChainIndexingConfig::from(s.config).to_wire(),
                    latest_indexed_block: s.latest_indexed_block.into(),
                    latest_known_block: s.latest_known_block.into(),
                }
            }
            ChainIndexingStatusSnapshot::Completed(s) => {
                SerializedChainIndexingStatusSnapshot::Completed {
                    config: ChainIndexingConfig::from(s.config).to_wire(),
                    latest_indexed_block: s.latest_indexed_block.into(),
                }
            }
        }
    }

    fn from_wire(wire: Self::Wire) -> Result<Self, StatusError> {
        let decoded = decode_chain_snapshot(wire)?;
        into_result(decoded.violations())?;
        Ok(decoded.snapshot)
    }
}

// ─── Omnichain ────────────────────────────────────────────────────────────────

impl From<OmnichainIndexingStatus> for SerializedOmnichainIndexingStatus {
    fn from(status: OmnichainIndexingStatus) -> Self {
        match status {
            OmnichainIndexingStatus::Unstarted => Self::Unstarted,
            OmnichainIndexingStatus::Backfill => Self::Backfill,
            OmnichainIndexingStatus::Following => Self::Following,
            OmnichainIndexingStatus::Completed => Self::Completed,
        }
    }
}

impl From<SerializedOmnichainIndexingStatus> for OmnichainIndexingStatus {
    fn from(status: SerializedOmnichainIndexingStatus) -> Self {
        match status {
            SerializedOmnichainIndexingStatus::Unstarted => Self::Unstarted,
            SerializedOmnichainIndexingStatus::Backfill => Self::Backfill,
            SerializedOmnichainIndexingStatus::Following => Self::Following,
            SerializedOmnichainIndexingStatus::Completed => Self::Completed,
        }
    }
}

/// Omnichain parts plus the violations the parts cannot carry, with paths
/// relative to the omnichain snapshot.
fn decode_omnichain_parts(
    wire: SerializedOmnichainIndexingStatusSnapshot,
) -> Result<(OmnichainSnapshotParts, Vec<Violation>), StatusError> {
    let (chains, mut violations) = decode_chain_map(wire.chains, decode_chain_snapshot)?;

    let mut snapshots = BTreeMap::new();
    for (chain_id, decoded) in chains {
        let prefix = chain_path(chain_id);
        violations.extend(decoded.unrepresentable.into_iter().map(|v| v.within(&prefix)));
        snapshots.insert(chain_id, decoded.snapshot);
    }

    let parts = OmnichainSnapshotParts {
        omnichain_status: wire.omnichain_status.into(),
        chains: snapshots,
        omnichain_indexing_cursor: wire.omnichain_indexing_cursor,
    };
    Ok((parts, violations))
}

impl WireCodec for OmnichainIndexingStatusSnapshot {
    type Wire = SerializedOmnichainIndexingStatusSnapshot;

    fn to_wire(&self) -> Self::Wire {
        SerializedOmnichainIndexingStatusSnapshot {
            omnichain_status: self.omnichain_status().into(),
            chains: self
                .chains()
                .iter()
                .map(|(chain_id, chain)| (chain_key(*chain_id), chain.to_wire()))
                .collect(),
            omnichain_indexing_cursor: self.omnichain_indexing_cursor(),
        }
    }

    fn from_wire(wire: Self::Wire) -> Result<Self, StatusError> {
        let (parts, violations) = decode_omnichain_parts(wire)?;
        with_decode_violations(parts.try_into(), violations)
    }
}

// ─── Cross-chain ──────────────────────────────────────────────────────────────

fn decode_cross_chain_parts(
    wire: SerializedCrossChainIndexingStatusSnapshot,
) -> Result<(CrossChainSnapshotParts, Vec<Violation>), StatusError> {
    match wire {
        SerializedCrossChainIndexingStatusSnapshot::Omnichain {
            slowest_chain_indexing_cursor,
            snapshot_time,
            omnichain_snapshot,
        } => {
            let (omnichain_snapshot, violations) = decode_omnichain_parts(omnichain_snapshot)?;
            let parts = CrossChainSnapshotParts {
                strategy: CrossChainIndexingStrategy::Omnichain,
                slowest_chain_indexing_cursor,
                snapshot_time,
                omnichain_snapshot,
            };
            let violations = violations
                .into_iter()
                .map(|v| v.within("omnichainSnapshot"))
                .collect();
            Ok((parts, violations))
        }
    }
}

impl WireCodec for CrossChainIndexingStatusSnapshot {
    type Wire = SerializedCrossChainIndexingStatusSnapshot;

    fn to_wire(&self) -> Self::Wire {
        match self.strategy() {
            CrossChainIndexingStrategy::Omnichain => {
                SerializedCrossChainIndexingStatusSnapshot::Omnichain {
                    slowest_chain_indexing_cursor: self.slowest_chain_indexing_cursor(),
                    snapshot_time: self.snapshot_time(),
                    omnichain_snapshot: self.omnichain_snapshot().to_wire(),
                }
            }
        }
    }

    fn from_wire(wire: Self::Wire) -> Result<Self, StatusError> {
        let (parts, violations) = decode_cross_chain_parts(wire)?;
        with_decode_violations(parts.try_into(), violations)
    }
}

// ─── Realtime projection ──────────────────────────────────────────────────────

impl WireCodec for RealtimeIndexingStatusProjection {
    type Wire = SerializedRealtimeIndexingStatusProjection;

    fn to_wire(&self) -> Self::Wire {
        SerializedRealtimeIndexingStatusProjection {
            projected_at: self.projected_at(),
            worst_case_distance: self.worst_case_distance(),
            snapshot: self.snapshot().to_wire(),
        }
    }

    fn from_wire(wire: Self::Wire) -> Result<Self, StatusError> {
        let (snapshot, violations) = decode_cross_chain_parts(wire.snapshot)?;
        let parts = ProjectionParts {
            projected_at: wire.projected_at,
            worst_case_distance: wire.worst_case_distance,
            snapshot,
        };
        let violations = violations.into_iter().map(|v| v.within("snapshot")).collect();
        with_decode_violations(parts.try_into(), violations)
    }
}

// ─── Chain facts ──────────────────────────────────────────────────────────────

impl WireCodec for ChainFacts {
    type Wire = SerializedChainFacts;

    fn to_wire(&self) -> Self::Wire {
        SerializedChainFacts {
            config: self.config.map(|config| config.to_wire()),
            latest_indexed_block: self.latest_indexed_block.map(Into::into),
            latest_known_block: self.latest_known_block.map(Into::into),
            backfill_end_block: self.backfill_end_block.map(Into::into),
        }
    }

    fn from_wire(wire: Self::Wire) -> Result<Self, StatusError> {
        let config = wire
            .config
            .map(ChainIndexingConfig::from_wire)
            .transpose()
            .map_err(|err| nest(err, "config"))?;
        Ok(ChainFacts {
            config,
            latest_indexed_block: wire.latest_indexed_block.map(Into::into),
            latest_known_block: wire.latest_known_block.map(Into::into),
            backfill_end_block: wire.backfill_end_block.map(Into::into),
        })
    }
}

pub fn serialize_chain_facts(facts: &BTreeMap<ChainId, ChainFacts>) -> SerializedChainFactsMap {
    facts
        .iter()
        .map(|(chain_id, facts)| (chain_key(*chain_id), facts.to_wire()))
        .collect()
}

pub fn deserialize_chain_facts(
    wire: SerializedChainFactsMap,
) -> Result<BTreeMap<ChainId, ChainFacts>, StatusError> {
    let (facts, violations) = decode_chain_map(wire, ChainFacts::from_wire)?;
    into_result(violations)?;
    Ok(facts)
}

pub fn chain_facts_from_json(json: &str) -> Result<BTreeMap<ChainId, ChainFacts>, StatusError> {
    let wire: SerializedChainFactsMap =
        serde_json::from_str(json).map_err(StatusError::deserialization)?;
    deserialize_chain_facts(wire)
}

pub fn chain_facts_to_json(facts: &BTreeMap<ChainId, ChainFacts>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&serialize_chain_facts(facts))
}
