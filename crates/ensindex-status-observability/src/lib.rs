//! # ensindex-status-observability
//!
//! Logging and metrics for the indexing status service.
//!
//! ## Built-in metrics
//! - `ensindex_status.omnichain_indexing_cursor` — gauge, tagged with omnichain status
//! - `ensindex_status.worst_case_distance`       — gauge (seconds)
//! - `ensindex_status.chain_latest_indexed`      — gauge, tagged with chain + chain status
//! - `ensindex_status.projections_served`        — counter, tagged with omnichain status
//! - `ensindex_status.status_failures`           — counter, tagged with error kind
//! - `ensindex_status.projection_latency_ms`     — histogram
//!
//! ## Structured logging
//! Text or JSON logs, with the level configurable per component.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::StatusMetrics;
pub use tracing_setup::{init_tracing, LogConfig};
