//! YAML configuration for `ensindex-status serve`.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use ensindex_status_api::ApiConfig;
use ensindex_status_observability::LogConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file '{}'", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("invalid config file '{}'", path.display()))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }
}
