//! `ensindex-status aggregate` — build a realtime projection from a facts file.

use std::path::Path;

use anyhow::{Context, Result};

use ensindex_status_codec::{chain_facts_from_json, WireCodec};
use ensindex_status_core::{
    build_chain_snapshots, CrossChainIndexingStatusSnapshot, OmnichainIndexingStatusSnapshot,
    RealtimeIndexingStatusProjection, UnixTimestamp,
};

pub fn build(
    facts_json: &str,
    snapshot_time: UnixTimestamp,
    now: UnixTimestamp,
) -> Result<RealtimeIndexingStatusProjection> {
    let facts = chain_facts_from_json(facts_json)?;
    let chains = build_chain_snapshots(&facts)?;
    let omnichain = OmnichainIndexingStatusSnapshot::aggregate(chains)?;
    let snapshot = CrossChainIndexingStatusSnapshot::omnichain(omnichain, snapshot_time);
    Ok(RealtimeIndexingStatusProjection::project(snapshot, now))
}

pub fn run(facts: &Path, snapshot_time: UnixTimestamp, now: Option<UnixTimestamp>) -> Result<()> {
    let raw = std::fs::read_to_string(facts)
        .with_context(|| format!("cannot read facts file '{}'", facts.display()))?;
    let projection = build(&raw, snapshot_time, now.unwrap_or(snapshot_time))
        .with_context(|| format!("cannot build indexing status from '{}'", facts.display()))?;

    println!("{}", serde_json::to_string_pretty(&projection.to_wire())?);
    Ok(())
}
