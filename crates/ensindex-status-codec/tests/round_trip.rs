//! Wire-format behaviour of complete status documents.

use std::collections::BTreeMap;

use ensindex_status_codec::{
    chain_facts_from_json, chain_facts_to_json, deserialize, serialize, WireCodec,
};
use ensindex_status_core::{
    build_chain_snapshots, validate::invariants, BlockRef, ChainFacts, ChainId,
    ChainIndexingConfig, CrossChainIndexingStatusSnapshot, OmnichainIndexingStatusSnapshot,
    RealtimeIndexingStatusProjection,
};
use serde_json::json;

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn id(n: u64) -> ChainId {
    ChainId::new(n).expect("non-zero chain id")
}

fn facts() -> BTreeMap<ChainId, ChainFacts> {
    BTreeMap::from([
        (
            id(1),
            ChainFacts::new(ChainIndexingConfig::indefinite(BlockRef::new(100, 500)))
                .latest_indexed(BlockRef::new(140, 1000))
                .latest_known(BlockRef::new(145, 1050)),
        ),
        (
            id(10),
            ChainFacts::new(ChainIndexingConfig::indefinite(BlockRef::new(2_000, 600)))
                .latest_indexed(BlockRef::new(2_300, 1200))
                .backfill_end(BlockRef::new(2_350, 1300)),
        ),
        (
            id(8453),
            ChainFacts::new(
                ChainIndexingConfig::definite(BlockRef::new(50, 1250), BlockRef::new(90, 1290))
                    .unwrap(),
            ),
        ),
    ])
}

fn projection() -> RealtimeIndexingStatusProjection {
    let omnichain =
        OmnichainIndexingStatusSnapshot::aggregate(build_chain_snapshots(&facts()).unwrap())
            .unwrap();
    let snapshot = CrossChainIndexingStatusSnapshot::omnichain(omnichain, 1400);
    RealtimeIndexingStatusProjection::project(snapshot, 1500)
}

// ─── Round trips ──────────────────────────────────────────────────────────────

#[test]
fn projection_survives_json() {
    let original = projection();
    let json = original.to_json_string().unwrap();
    let decoded = RealtimeIndexingStatusProjection::from_json_str(&json).unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn projection_survives_wire_structs() {
    let original = projection();
    let decoded: RealtimeIndexingStatusProjection = deserialize(serialize(&original)).unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn facts_survive_json() {
    let json = chain_facts_to_json(&facts()).unwrap();
    assert_eq!(chain_facts_from_json(&json).unwrap(), facts());
}

// ─── Document shape ───────────────────────────────────────────────────────────

#[test]
fn projection_document_shape() {
    let value = projection().to_json_value().unwrap();

    assert_eq!(value["projectedAt"], 1500);
    assert_eq!(value["worstCaseDistance"], 300);
    assert_eq!(value["snapshot"]["strategy"], "omnichain");
    assert_eq!(value["snapshot"]["slowestChainIndexingCursor"], 1200);
    assert_eq!(value["snapshot"]["snapshotTime"], 1400);

    let omnichain = &value["snapshot"]["omnichainSnapshot"];
    assert_eq!(omnichain["omnichainStatus"], "Following");
    assert_eq!(omnichain["omnichainIndexingCursor"], 1200);
    assert_eq!(omnichain["chains"]["1"]["chainStatus"], "Following");
    assert_eq!(omnichain["chains"]["10"]["chainStatus"], "Backfill");
    assert_eq!(omnichain["chains"]["8453"]["chainStatus"], "Queued");
    assert_eq!(omnichain["chains"]["8453"]["config"]["configType"], "definite");
    assert_eq!(omnichain["chains"]["1"]["config"]["endBlock"], serde_json::Value::Null);
}

// ─── Rejection ────────────────────────────────────────────────────────────────

#[test]
fn tampered_omnichain_status_is_rejected() {
    let mut value = projection().to_json_value().unwrap();
    value["snapshot"]["omnichainSnapshot"]["omnichainStatus"] = json!("Completed");

    let err = RealtimeIndexingStatusProjection::from_json_value(value).unwrap_err();
    assert!(err.names_invariant(invariants::OMNICHAIN_STATUS_DERIVED));
    assert_eq!(err.violations()[0].path, "snapshot.omnichainSnapshot");
}

#[test]
fn tampered_distance_and_chain_are_reported_together() {
    let mut value = projection().to_json_value().unwrap();
    value["worstCaseDistance"] = json!(10);
    value["snapshot"]["omnichainSnapshot"]["chains"]["10"]["latestIndexedBlock"] =
        json!({ "number": 2_400, "timestamp": 1200 });

    let err = RealtimeIndexingStatusProjection::from_json_value(value).unwrap_err();
    let found: Vec<_> = err
        .violations()
        .iter()
        .map(|v| (v.path.as_str(), v.invariant))
        .collect();
    assert!(found.contains(&("", invariants::WORST_CASE_DISTANCE_DERIVED)));
    assert!(found.contains(&(
        "snapshot.omnichainSnapshot.chains[10]",
        invariants::LATEST_INDEXED_BEFORE_BACKFILL_END
    )));
}

#[test]
fn truncated_document_is_malformed() {
    let json = projection().to_json_string().unwrap();
    let err = RealtimeIndexingStatusProjection::from_json_str(&json[..json.len() / 2]).unwrap_err();
    assert!(err.is_deserialization());
}

#[test]
fn unknown_strategy_is_malformed() {
    let mut value = projection().to_json_value().unwrap();
    value["snapshot"]["strategy"] = json!("chainbychain");
    assert!(RealtimeIndexingStatusProjection::from_json_value(value)
        .unwrap_err()
        .is_deserialization());
}
