//! Per-chain state builder — maps raw indexer/RPC facts onto exactly one
//! [`ChainIndexingStatusSnapshot`] variant.

use std::collections::BTreeMap;

use tracing::warn;

use crate::block::BlockRef;
use crate::chain::ChainId;
use crate::chain_status::{
    ChainBackfillSnapshot, ChainCompletedSnapshot, ChainFollowingSnapshot,
    ChainIndexingStatusSnapshot, ChainQueuedSnapshot,
};
use crate::config::ChainIndexingConfig;
use crate::error::StatusError;
use crate::validate::Validate;

/// Raw facts about one chain, as reported by the indexing pipeline and
/// the RPC health prober.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChainFacts {
    /// Static indexing plan. Required.
    pub config: Option<ChainIndexingConfig>,
    /// Last block written by the indexer.
    pub latest_indexed_block: Option<BlockRef>,
    /// Current chain head as seen by RPC.
    pub latest_known_block: Option<BlockRef>,
    /// Target the indexer is backfilling towards.
    pub backfill_end_block: Option<BlockRef>,
}

impl ChainFacts {
    pub fn new(config: ChainIndexingConfig) -> Self {
        Self {
            config: Some(config),
            ..Default::default()
        }
    }

    pub fn latest_indexed(mut self, block: BlockRef) -> Self {
        self.latest_indexed_block = Some(block);
        self
    }

    pub fn latest_known(mut self, block: BlockRef) -> Self {
        self.latest_known_block = Some(block);
        self
    }

    pub fn backfill_end(mut self, block: BlockRef) -> Self {
        self.backfill_end_block = Some(block);
        self
    }
}

/// Build the snapshot for one chain.
///
/// - no indexed block → `Queued`
/// - definite config: indexed block at the end block → `Completed`, else `Backfill`
///   towards the end block
/// - indefinite config: backfill end ahead of the indexed block → `Backfill`,
///   else `Following` (requires a known head block)
///
/// The result is validated; any broken ordering is reported as
/// [`StatusError::InvalidChainStatus`] listing every violation.
pub fn build_chain_snapshot(
    chain_id: ChainId,
    facts: &ChainFacts,
) -> Result<ChainIndexingStatusSnapshot, StatusError> {
    let invalid = |reason: &str| StatusError::invalid_chain_status(chain_id, reason);

    let config = facts
        .config
        .ok_or_else(|| invalid("no indexing config registered for chain"))?;

    let snapshot: ChainIndexingStatusSnapshot = match (config, facts.latest_indexed_block) {
        (config, None) => ChainQueuedSnapshot { config }.into(),

        (ChainIndexingConfig::Definite(definite), Some(latest_indexed)) => {
            if let Some(backfill_end) = facts.backfill_end_block {
                if backfill_end != definite.end_block {
                    return Err(invalid(&format!(
                        "backfill end block ({backfill_end}) differs from config end block ({})",
                        definite.end_block
                    )));
                }
            }
            if latest_indexed == definite.end_block {
                ChainCompletedSnapshot {
                    config: definite,
                    latest_indexed_block: latest_indexed,
                }
                .into()
            } else {
                ChainBackfillSnapshot {
                    config,
                    latest_indexed_block: latest_indexed,
                    backfill_end_block: definite.end_block,
                }
                .into()
            }
        }

        (ChainIndexingConfig::Indefinite(indefinite), Some(latest_indexed)) => {
            match facts.backfill_end_block {
                Some(backfill_end) if latest_indexed.number < backfill_end.number => {
                    ChainBackfillSnapshot {
                        config,
                        latest_indexed_block: latest_indexed,
                        backfill_end_block: backfill_end,
                    }
                    .into()
                }
                _ => {
                    let latest_known = facts.latest_known_block.ok_or_else(|| {
                        invalid("chain has caught up but no latest known block was reported")
                    })?;
                    ChainFollowingSnapshot {
                        config: indefinite,
                        latest_indexed_block: latest_indexed,
                        latest_known_block: latest_known,
                    }
                    .into()
                }
            }
        }
    };

    snapshot.validate().map_err(|err| {
        let reason = err
            .violations()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        warn!(chain_id = %chain_id, status = %snapshot.status(), %reason, "rejected chain facts");
        invalid(&reason)
    })?;

    Ok(snapshot)
}

/// Build snapshots for every chain, failing on the first chain whose facts
/// cannot be mapped.
pub fn build_chain_snapshots<'a>(
    facts: impl IntoIterator<Item = (&'a ChainId, &'a ChainFacts)>,
) -> Result<BTreeMap<ChainId, ChainIndexingStatusSnapshot>, StatusError> {
    facts
        .into_iter()
        .map(|(chain_id, facts)| build_chain_snapshot(*chain_id, facts).map(|s| (*chain_id, s)))
        .collect()
}
