//! Chain identifier type.

use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

/// Numeric chain identifier (EIP-155 chain id for EVM chains).
///
/// Always positive. Used as the key of the per-chain snapshot map; the wire
/// codec renders it as a decimal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChainId(NonZeroU64);

impl ChainId {
    /// Returns `None` for `0`.
    pub const fn new(id: u64) -> Option<Self> {
        match NonZeroU64::new(id) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a chain id is zero or not a decimal integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid chain id '{0}': expected a positive decimal integer")]
pub struct ParseChainIdError(pub String);

impl FromStr for ChainId {
    type Err = ParseChainIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // `u64::from_str` accepts a leading '+' and leading zeros; neither is
        // a canonical key.
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) || s.starts_with('0') {
            return Err(ParseChainIdError(s.to_string()));
        }
        s.parse::<u64>()
            .ok()
            .and_then(ChainId::new)
            .ok_or_else(|| ParseChainIdError(s.to_string()))
    }
}

impl TryFrom<u64> for ChainId {
    type Error = ParseChainIdError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        ChainId::new(value).ok_or_else(|| ParseChainIdError(value.to_string()))
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.get()
    }
}

/// Well-known chain ids indexed by ENS deployments.
pub mod chains {
    use super::ChainId;

    const fn known(id: u64) -> ChainId {
        match ChainId::new(id) {
            Some(id) => id,
            None => panic!("chain id must be non-zero"),
        }
    }

    pub const ETHEREUM: ChainId = known(1);
    pub const OPTIMISM: ChainId = known(10);
    pub const BASE: ChainId = known(8453);
    pub const ARBITRUM: ChainId = known(42161);
    pub const LINEA: ChainId = known(59144);
    pub const SEPOLIA: ChainId = known(11155111);
}
