//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use ensindex_status_core::{DurationSecs, DEFAULT_GAP_THRESHOLD};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_listen_address")]
    pub listen_address: SocketAddr,
    /// JSON facts file written by the indexer, re-read on every request.
    /// When unset the server starts with an empty in-memory source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facts_file: Option<PathBuf>,
    /// Gap threshold (seconds) used when a request does not carry `gapThreshold`.
    #[serde(default = "default_gap_threshold")]
    pub default_gap_threshold: DurationSecs,
    #[serde(default)]
    pub permissive_cors: bool,
}

fn default_listen_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 42069))
}

fn default_gap_threshold() -> DurationSecs {
    DEFAULT_GAP_THRESHOLD
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            facts_file: None,
            default_gap_threshold: default_gap_threshold(),
            permissive_cors: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: ApiConfig =
            serde_yaml::from_str("facts_file: /var/lib/ensindexer/facts.json").unwrap();
        assert_eq!(config.listen_address.port(), 42069);
        assert_eq!(config.default_gap_threshold, 600);
        assert_eq!(
            config.facts_file.as_deref(),
            Some(std::path::Path::new("/var/lib/ensindexer/facts.json"))
        );
        assert!(!config.permissive_cors);
    }
}
