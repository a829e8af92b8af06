//! Builds a fresh projection from the current facts on every request.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use ensindex_status_core::{
    build_chain_snapshots, CrossChainIndexingStatusSnapshot, DurationSecs,
    OmnichainIndexingStatusSnapshot, RealtimeIndexingStatusProjection,
};
use ensindex_status_observability::StatusMetrics;

use crate::clock::Clock;
use crate::error::ApiError;
use crate::source::ChainFactsSource;

pub struct StatusService {
    source: Arc<dyn ChainFactsSource>,
    clock: Arc<dyn Clock>,
    metrics: StatusMetrics,
    default_gap_threshold: DurationSecs,
}

impl StatusService {
    pub fn new(
        source: Arc<dyn ChainFactsSource>,
        clock: Arc<dyn Clock>,
        metrics: StatusMetrics,
        default_gap_threshold: DurationSecs,
    ) -> Self {
        Self {
            source,
            clock,
            metrics,
            default_gap_threshold,
        }
    }

    pub fn default_gap_threshold(&self) -> DurationSecs {
        self.default_gap_threshold
    }

    /// Snapshot the current facts and project them onto the clock's `now`.
    pub async fn projection(&self) -> Result<RealtimeIndexingStatusProjection, ApiError> {
        let started = Instant::now();
        let result = self.build_projection().await;

        match &result {
            Ok(projection) => {
                self.metrics.record_projection(projection);
                self.metrics
                    .record_latency(started.elapsed().as_secs_f64() * 1_000.0);
                debug!(
                    projected_at = projection.projected_at(),
                    worst_case_distance = projection.worst_case_distance(),
                    "built realtime projection"
                );
            }
            Err(ApiError::Status(err)) => {
                self.metrics.record_failure(err.kind());
                warn!(error = %err, "indexing status unavailable");
            }
            Err(err) => {
                self.metrics.record_failure("source");
                warn!(error = %err, "indexing status unavailable");
            }
        }
        result
    }

    async fn build_projection(&self) -> Result<RealtimeIndexingStatusProjection, ApiError> {
        let facts = self.source.chain_facts().await?;
        let chains = build_chain_snapshots(&facts)?;
        let omnichain = OmnichainIndexingStatusSnapshot::aggregate(chains)?;

        let now = self.clock.now();
        let snapshot = CrossChainIndexingStatusSnapshot::omnichain(omnichain, now);
        Ok(RealtimeIndexingStatusProjection::project(snapshot, now))
    }
}
