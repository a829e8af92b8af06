//! `ensindex-status inspect` — validate and summarise a serialized projection.

use std::path::Path;

use anyhow::{Context, Result};

use ensindex_status_codec::WireCodec;
use ensindex_status_core::{
    DurationSecs, RealtimeGapCheck, RealtimeIndexingStatusProjection, UnixTimestamp,
};

/// Decode `json` and, if `now` is given, re-project its snapshot onto `now`.
pub fn load(json: &str, now: Option<UnixTimestamp>) -> Result<RealtimeIndexingStatusProjection> {
    let projection = RealtimeIndexingStatusProjection::from_json_str(json)?;
    Ok(match now {
        Some(now) => RealtimeIndexingStatusProjection::project(projection.snapshot().clone(), now),
        None => projection,
    })
}

pub fn run(file: &Path, now: Option<UnixTimestamp>, gap_threshold: DurationSecs) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("cannot read '{}'", file.display()))?;
    let projection =
        load(&raw, now).with_context(|| format!("'{}' is not a valid projection", file.display()))?;

    let snapshot = projection.snapshot();
    let omnichain = snapshot.omnichain_snapshot();
    let gap = RealtimeGapCheck::evaluate(&projection, gap_threshold);

    println!("Strategy:             {}", snapshot.strategy());
    println!("Omnichain status:     {}", omnichain.omnichain_status());
    println!("Indexing cursor:      {}", omnichain.omnichain_indexing_cursor());
    if let Some(earliest) = omnichain.lowest_start_block_timestamp() {
        println!("Earliest start:       {earliest}");
    }
    println!("Snapshot time:        {}", snapshot.snapshot_time());
    println!("Projected at:         {}", projection.projected_at());
    println!(
        "Worst case distance:  {}s ({} threshold {}s)",
        projection.worst_case_distance(),
        if gap.within_threshold { "within" } else { "beyond" },
        gap.realtime_indexing_gap_threshold
    );
    println!();
    println!("{:<12} {:<10} {:>14} {:>14}", "CHAIN", "STATUS", "INDEXED", "KNOWN");
    for (chain_id, chain) in omnichain.chains() {
        let indexed = chain
            .latest_indexed_block()
            .map(|b| b.number.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<12} {:<10} {:>14} {:>14}",
            chain_id.to_string(),
            chain.status().as_str(),
            indexed,
            chain.highest_known_block().number
        );
    }
    Ok(())
}
