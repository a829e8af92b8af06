//! Where the per-chain facts come from.
//!
//! The indexing pipeline and the RPC prober live outside this service; a
//! [`ChainFactsSource`] is the seam they report through.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use ensindex_status_codec::chain_facts_from_json;
use ensindex_status_core::{ChainFacts, ChainId, StatusError};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Cannot read facts file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Facts file {} is invalid: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: StatusError,
    },
}

/// Latest known facts for every tracked chain.
#[async_trait]
pub trait ChainFactsSource: Send + Sync {
    async fn chain_facts(&self) -> Result<BTreeMap<ChainId, ChainFacts>, SourceError>;
}

/// Facts pushed in-process.
#[derive(Debug, Default)]
pub struct MemoryFactsSource {
    facts: RwLock<BTreeMap<ChainId, ChainFacts>>,
}

impl MemoryFactsSource {
    pub fn new(facts: BTreeMap<ChainId, ChainFacts>) -> Self {
        Self {
            facts: RwLock::new(facts),
        }
    }

    /// Insert or replace the facts of one chain.
    pub async fn update(&self, chain_id: ChainId, facts: ChainFacts) {
        self.facts.write().await.insert(chain_id, facts);
    }

    pub async fn replace(&self, facts: BTreeMap<ChainId, ChainFacts>) {
        *self.facts.write().await = facts;
    }
}

#[async_trait]
impl ChainFactsSource for MemoryFactsSource {
    async fn chain_facts(&self) -> Result<BTreeMap<ChainId, ChainFacts>, SourceError> {
        Ok(self.facts.read().await.clone())
    }
}

/// Facts read from a JSON file on every call.
#[derive(Debug, Clone)]
pub struct FileFactsSource {
    path: PathBuf,
}

impl FileFactsSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ChainFactsSource for FileFactsSource {
    async fn chain_facts(&self) -> Result<BTreeMap<ChainId, ChainFacts>, SourceError> {
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;
        chain_facts_from_json(&json).map_err(|source| SourceError::Invalid {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensindex_status_core::{BlockRef, ChainIndexingConfig};

    fn id(n: u64) -> ChainId {
        ChainId::new(n).unwrap()
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ensindex-status-{}-{name}", std::process::id()))
    }

    #[tokio::test]
    async fn memory_source_updates() {
        let source = MemoryFactsSource::default();
        assert!(source.chain_facts().await.unwrap().is_empty());

        let facts = ChainFacts::new(ChainIndexingConfig::indefinite(BlockRef::new(1, 100)));
        source.update(id(1), facts).await;
        source.update(id(10), facts).await;
        assert_eq!(source.chain_facts().await.unwrap().len(), 2);

        source.replace(BTreeMap::new()).await;
        assert!(source.chain_facts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_source_reads_facts() {
        let path = temp_path("facts.json");
        tokio::fs::write(
            &path,
            r#"{
                "1": {
                    "config": {
                        "configType": "indefinite",
                        "startBlock": { "number": 100, "timestamp": 500 },
                        "endBlock": null
                    },
                    "latestIndexedBlock": { "number": 140, "timestamp": 1000 },
                    "latestKnownBlock": { "number": 145, "timestamp": 1050 }
                }
            }"#,
        )
        .await
        .unwrap();

        let facts = FileFactsSource::new(&path).chain_facts().await.unwrap();
        assert_eq!(
            facts[&id(1)].latest_indexed_block,
            Some(BlockRef::new(140, 1000))
        );
        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn file_source_reports_missing_and_invalid_files() {
        let missing = FileFactsSource::new(temp_path("missing.json"));
        assert!(matches!(
            missing.chain_facts().await,
            Err(SourceError::Io { .. })
        ));

        let path = temp_path("invalid.json");
        tokio::fs::write(&path, r#"{ "0": {} }"#).await.unwrap();
        let err = FileFactsSource::new(&path).chain_facts().await.unwrap_err();
        assert!(matches!(
            err,
            SourceError::Invalid { ref source, .. } if source.is_deserialization()
        ));
        tokio::fs::remove_file(&path).await.unwrap();
    }
}
