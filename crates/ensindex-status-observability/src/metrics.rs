//! Indexing status metrics.
//!
//! All metrics use OpenTelemetry conventions and are exported by whatever
//! meter provider the host application installs.

use opentelemetry::{
    global,
    metrics::{Counter, Gauge, Histogram, Meter},
    KeyValue,
};

use ensindex_status_core::RealtimeIndexingStatusProjection;

/// Central metrics handle for the status service.
#[derive(Clone)]
pub struct StatusMetrics {
    pub omnichain_indexing_cursor: Gauge<u64>,
    pub worst_case_distance: Gauge<u64>,
    pub chain_latest_indexed: Gauge<u64>,
    pub projections_served: Counter<u64>,
    pub status_failures: Counter<u64>,
    pub projection_latency_ms: Histogram<f64>,
}

impl StatusMetrics {
    pub fn new(meter: &Meter) -> Self {
        Self {
            omnichain_indexing_cursor: meter
                .u64_gauge("ensindex_status.omnichain_indexing_cursor")
                .with_description("Omnichain indexing cursor (unix seconds)")
                .build(),
            worst_case_distance: meter
                .u64_gauge("ensindex_status.worst_case_distance")
                .with_description("Upper bound on the distance from realtime, in seconds")
                .build(),
            chain_latest_indexed: meter
                .u64_gauge("ensindex_status.chain_latest_indexed")
                .with_description("Timestamp of the latest indexed block per chain")
                .build(),
            projections_served: meter
                .u64_counter("ensindex_status.projections_served")
                .with_description("Realtime projections built and returned")
                .build(),
            status_failures: meter
                .u64_counter("ensindex_status.status_failures")
                .with_description("Status requests that could not produce a valid projection")
                .build(),
            projection_latency_ms: meter
                .f64_histogram("ensindex_status.projection_latency_ms")
                .with_description("Time to build a projection from raw facts in milliseconds")
                .build(),
        }
    }

    /// Metrics bound to the globally installed meter provider.
    pub fn global() -> Self {
        Self::new(&global::meter("ensindex-status"))
    }

    pub fn record_projection(&self, projection: &RealtimeIndexingStatusProjection) {
        let omnichain = projection.snapshot().omnichain_snapshot();
        let status = [KeyValue::new(
            "omnichain_status",
            omnichain.omnichain_status().as_str(),
        )];

        self.omnichain_indexing_cursor
            .record(omnichain.omnichain_indexing_cursor(), &status);
        self.worst_case_distance
            .record(projection.worst_case_distance(), &[]);
        self.projections_served.add(1, &status);

        for (chain_id, chain) in omnichain.chains() {
            if let Some(block) = chain.latest_indexed_block() {
                self.chain_latest_indexed.record(
                    block.timestamp,
                    &[
                        KeyValue::new("chain", chain_id.to_string()),
                        KeyValue::new("chain_status", chain.status().as_str()),
                    ],
                );
            }
        }
    }

    /// `error_type` is a short label such as `StatusError::kind()`.
    pub fn record_failure(&self, error_type: &'static str) {
        self.status_failures
            .add(1, &[KeyValue::new("error_type", error_type)]);
    }

    pub fn record_latency(&self, ms: f64) {
        self.projection_latency_ms.record(ms, &[]);
    }
}
