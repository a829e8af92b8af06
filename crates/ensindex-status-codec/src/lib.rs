//! ensindex-status-codec — JSON wire format for the indexing status model.
//!
//! ```text
//! domain value ──to_wire()──► Serialized* ──serde_json──► JSON
//! JSON ──serde_json──► Serialized* ──from_wire()──► validated domain value
//! ```
//!
//! Decoding reports malformed input as `StatusError::Deserialization` and
//! well-formed but inconsistent input as `StatusError::InvariantViolation`,
//! listing every broken invariant with its location.

pub mod codec;
pub mod wire;

pub use codec::{
    chain_facts_from_json, chain_facts_to_json, deserialize, deserialize_chain_facts, serialize,
    serialize_chain_facts, WireCodec,
};
pub use wire::{
    SerializedBlockRef, SerializedChainFacts, SerializedChainFactsMap,
    SerializedChainIndexingConfig, SerializedChainIndexingStatusSnapshot, SerializedConfigType,
    SerializedCrossChainIndexingStatusSnapshot, SerializedOmnichainIndexingStatus,
    SerializedOmnichainIndexingStatusSnapshot, SerializedRealtimeIndexingStatusProjection,
};
