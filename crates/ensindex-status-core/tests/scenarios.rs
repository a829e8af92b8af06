//! End-to-end status scenarios: raw chain facts → omnichain snapshot →
//! cross-chain snapshot → realtime projection.

use std::collections::BTreeMap;

use ensindex_status_core::{
    build_chain_snapshot, build_chain_snapshots,
    chain::chains,
    validate::invariants,
    BlockRef, ChainBackfillSnapshot, ChainFacts, ChainId, ChainIndexingConfig,
    ChainIndexingStatusSnapshot, ChainStatus, CrossChainIndexingStatusSnapshot,
    OmnichainIndexingStatus, OmnichainIndexingStatusSnapshot, RealtimeGapCheck,
    RealtimeIndexingStatusProjection, StatusError, Validate, DEFAULT_GAP_THRESHOLD,
};

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn id(n: u64) -> ChainId {
    ChainId::new(n).expect("non-zero chain id")
}

// ─── Scenario A: one chain following, one backfilling ─────────────────────────

#[test]
fn scenario_following_and_backfill() {
    let facts = BTreeMap::from([
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
                .backfill_end(BlockRef::new(2_350, 1300))
                .latest_known(BlockRef::new(2_400, 1350)),
        ),
    ]);

    let chains = build_chain_snapshots(&facts).unwrap();
    assert_eq!(chains[&id(1)].status(), ChainStatus::Following);
    assert_eq!(chains[&id(10)].status(), ChainStatus::Backfill);

    let omnichain = OmnichainIndexingStatusSnapshot::aggregate(chains).unwrap();
    assert_eq!(omnichain.omnichain_status(), OmnichainIndexingStatus::Following);
    assert_eq!(omnichain.omnichain_indexing_cursor(), 1200);

    let snapshot = CrossChainIndexingStatusSnapshot::omnichain(omnichain, 1400);
    assert_eq!(snapshot.slowest_chain_indexing_cursor(), 1200);
    assert_eq!(snapshot.snapshot_time(), 1400);

    let projection = RealtimeIndexingStatusProjection::project(snapshot, 1500);
    assert_eq!(projection.worst_case_distance(), 300);
    assert!(projection.validate().is_ok());
}

// ─── Scenario B: nothing started yet ──────────────────────────────────────────

#[test]
fn scenario_all_queued() {
    let facts = BTreeMap::from([
        (id(1), ChainFacts::new(ChainIndexingConfig::indefinite(BlockRef::new(10, 500)))),
        (
            chains::BASE,
            ChainFacts::new(
                ChainIndexingConfig::definite(BlockRef::new(20, 700), BlockRef::new(90, 900))
                    .unwrap(),
            ),
        ),
    ]);
    let omnichain =
        OmnichainIndexingStatusSnapshot::aggregate(build_chain_snapshots(&facts).unwrap()).unwrap();
    assert_eq!(omnichain.omnichain_status(), OmnichainIndexingStatus::Unstarted);
    assert_eq!(omnichain.omnichain_indexing_cursor(), 500);

    // snapshot time must still dominate the definite end block
    let snapshot = CrossChainIndexingStatusSnapshot::omnichain(omnichain, 600);
    assert_eq!(snapshot.snapshot_time(), 900);
    assert!(snapshot.validate().is_ok());
}

// ─── Scenario C: projection requested before the snapshot time ────────────────

#[test]
fn scenario_projection_clamped_to_snapshot_time() {
    let facts = BTreeMap::from([(
        id(1),
        ChainFacts::new(ChainIndexingConfig::indefinite(BlockRef::new(1, 100)))
            .latest_indexed(BlockRef::new(70, 900))
            .latest_known(BlockRef::new(72, 920)),
    )]);
    let omnichain =
        OmnichainIndexingStatusSnapshot::aggregate(build_chain_snapshots(&facts).unwrap()).unwrap();
    let snapshot = CrossChainIndexingStatusSnapshot::omnichain(omnichain, 950);
    assert_eq!(snapshot.slowest_chain_indexing_cursor(), 900);

    let projection = RealtimeIndexingStatusProjection::project(snapshot, 940);
    assert_eq!(projection.projected_at(), 950);
    assert_eq!(projection.worst_case_distance(), 50);

    let gap = RealtimeGapCheck::evaluate(&projection, DEFAULT_GAP_THRESHOLD);
    assert!(gap.within_threshold);
}

// ─── Rejection ────────────────────────────────────────────────────────────────

#[test]
fn backfill_past_its_end_is_rejected() {
    let snapshot: ChainIndexingStatusSnapshot = ChainBackfillSnapshot {
        config: ChainIndexingConfig::indefinite(BlockRef::new(100, 1000)),
        latest_indexed_block: BlockRef::new(300, 3000),
        backfill_end_block: BlockRef::new(250, 3000),
    }
    .into();

    let err = snapshot.validate().unwrap_err();
    assert!(matches!(err, StatusError::InvariantViolation { .. }));
    assert!(err.names_invariant(invariants::LATEST_INDEXED_BEFORE_BACKFILL_END));
    assert!(err.to_string().contains("latestIndexedBlock <= backfillEndBlock"));

    let aggregated =
        OmnichainIndexingStatusSnapshot::aggregate(BTreeMap::from([(id(1), snapshot)]));
    assert!(aggregated
        .unwrap_err()
        .names_invariant(invariants::LATEST_INDEXED_BEFORE_BACKFILL_END));
}

#[test]
fn empty_chain_set_is_rejected() {
    let facts: BTreeMap<ChainId, ChainFacts> = BTreeMap::new();
    let chains = build_chain_snapshots(&facts).unwrap();
    assert_eq!(
        OmnichainIndexingStatusSnapshot::aggregate(chains).unwrap_err(),
        StatusError::EmptyChainSet
    );
}

// ─── Lifecycle ────────────────────────────────────────────────────────────────

#[test]
fn definite_chain_lifecycle() {
    let config = ChainIndexingConfig::definite(BlockRef::new(100, 1000), BlockRef::new(200, 2000))
        .unwrap();
    let steps = [
        (None, ChainStatus::Queued, OmnichainIndexingStatus::Unstarted),
        (
            Some(BlockRef::new(100, 1000)),
            ChainStatus::Backfill,
            OmnichainIndexingStatus::Backfill,
        ),
        (
            Some(BlockRef::new(199, 1990)),
            ChainStatus::Backfill,
            OmnichainIndexingStatus::Backfill,
        ),
        (
            Some(BlockRef::new(200, 2000)),
            ChainStatus::Completed,
            OmnichainIndexingStatus::Completed,
        ),
    ];

    for (latest_indexed, chain_status, omnichain_status) in steps {
        let facts = ChainFacts {
            config: Some(config),
            latest_indexed_block: latest_indexed,
            ..Default::default()
        };
        let chain = build_chain_snapshot(id(1), &facts).unwrap();
        assert_eq!(chain.status(), chain_status);

        let omnichain = OmnichainIndexingStatusSnapshot::aggregate(BTreeMap::from([(id(1), chain)]))
            .unwrap();
        assert_eq!(omnichain.omnichain_status(), omnichain_status);
    }
}
