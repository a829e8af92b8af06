//! Per-chain indexing plan.

use std::fmt;

use crate::block::BlockRef;
use crate::error::StatusError;
use crate::validate::Validate;

/// Discriminant of [`ChainIndexingConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainIndexingConfigType {
    /// No end block: the chain is followed forever.
    Indefinite,
    /// Fixed end block: indexing completes once it is reached.
    Definite,
}

impl ChainIndexingConfigType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Indefinite => "indefinite",
            Self::Definite => "definite",
        }
    }
}

impl fmt::Display for ChainIndexingConfigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Indexing plan without an end block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndefiniteConfig {
    pub start_block: BlockRef,
}

/// Indexing plan with a fixed, inclusive end block.
///
/// Invariant: `start_block <= end_block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DefiniteConfig {
    pub start_block: BlockRef,
    pub end_block: BlockRef,
}

/// Static indexing plan of one chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainIndexingConfig {
    Indefinite(IndefiniteConfig),
    Definite(DefiniteConfig),
}

impl ChainIndexingConfig {
    pub fn indefinite(start_block: BlockRef) -> Self {
        Self::Indefinite(IndefiniteConfig { start_block })
    }

    /// Build a definite config, rejecting an end block before the start block.
    pub fn definite(start_block: BlockRef, end_block: BlockRef) -> Result<Self, StatusError> {
        let config = Self::Definite(DefiniteConfig {
            start_block,
            end_block,
        });
        config.validate()?;
        Ok(config)
    }

    /// Build a config from an optional end block.
    pub fn new(start_block: BlockRef, end_block: Option<BlockRef>) -> Result<Self, StatusError> {
        match end_block {
            Some(end_block) => Self::definite(start_block, end_block),
            None => Ok(Self::indefinite(start_block)),
        }
    }

    pub fn config_type(&self) -> ChainIndexingConfigType {
        match self {
            Self::Indefinite(_) => ChainIndexingConfigType::Indefinite,
            Self::Definite(_) => ChainIndexingConfigType::Definite,
        }
    }

    pub fn start_block(&self) -> BlockRef {
        match self {
            Self::Indefinite(c) => c.start_block,
            Self::Definite(c) => c.start_block,
        }
    }

    /// The end block, or `None` for indefinite configs.
    pub fn end_block(&self) -> Option<BlockRef> {
        match self {
            Self::Indefinite(_) => None,
            Self::Definite(c) => Some(c.end_block),
        }
    }
}

impl From<IndefiniteConfig> for ChainIndexingConfig {
    fn from(config: IndefiniteConfig) -> Self {
        Self::Indefinite(config)
    }
}

impl From<DefiniteConfig> for ChainIndexingConfig {
    fn from(config: DefiniteConfig) -> Self {
        Self::Definite(config)
    }
}
