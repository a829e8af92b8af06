//! ensindex-status-api — HTTP surface for the indexing status.
//!
//! | Route                      | Response                                            |
//! |----------------------------|-----------------------------------------------------|
//! | `GET /api/indexing-status` | serialized realtime projection, `503` if unavailable |
//! | `GET /amirealtime`         | gap check, `200` within threshold / `503` beyond     |
//! | `GET /health`              | liveness                                            |

use std::future::Future;
use std::sync::Arc;

use axum::{routing::get, Router};
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace};
use tracing::{info, Level};

use ensindex_status_observability::StatusMetrics;

pub mod clock;
pub mod config;
pub mod error;
pub mod params;
pub mod routes;
pub mod service;
pub mod source;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ApiConfig;
pub use error::ApiError;
pub use service::StatusService;
pub use source::{ChainFactsSource, FileFactsSource, MemoryFactsSource, SourceError};

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("Cannot bind {address}: {source}")]
    Bind {
        address: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server stopped with an error: {0}")]
    Shutdown(#[source] std::io::Error),
}

pub fn router(service: Arc<StatusService>, permissive_cors: bool) -> Router {
    Router::new()
        .route("/api/indexing-status", get(routes::status::indexing_status))
        .route("/amirealtime", get(routes::realtime::am_i_realtime))
        .route("/health", get(routes::health::naked))
        .with_state(service)
        .layer(
            trace::TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(if permissive_cors {
            CorsLayer::permissive()
        } else {
            CorsLayer::new()
        })
}

/// Facts source selected by the config: the facts file if set, otherwise an
/// empty in-memory source.
pub fn facts_source(config: &ApiConfig) -> Arc<dyn ChainFactsSource> {
    match &config.facts_file {
        Some(path) => Arc::new(FileFactsSource::new(path)),
        None => Arc::new(MemoryFactsSource::default()),
    }
}

/// Run the server until `shutdown` resolves.
pub async fn serve(
    config: &ApiConfig,
    source: Arc<dyn ChainFactsSource>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ServeError> {
    let service = Arc::new(StatusService::new(
        source,
        Arc::new(SystemClock),
        StatusMetrics::global(),
        config.default_gap_threshold,
    ));
    let app = router(service, config.permissive_cors);

    let listener = tokio::net::TcpListener::bind(config.listen_address)
        .await
        .map_err(|source| ServeError::Bind {
            address: config.listen_address,
            source,
        })?;

    info!(
        address = %config.listen_address,
        gap_threshold = config.default_gap_threshold,
        "indexing status API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServeError::Shutdown)?;

    info!("indexing status API stopped");
    Ok(())
}
