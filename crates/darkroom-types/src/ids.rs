//! Typed identifiers for chains and the nodes inside them.
//!
//! `ChainId` wraps a UUIDv7 (time-ordered, globally unique): every call to
//! `start a new chain` mints a fresh one, so handles from an abandoned chain
//! can never be mistaken for handles into the live one. It displays as
//! standard UUID text for logging; the `short()` form (first 8 hex chars) is
//! for human-facing UI, never a lookup key.
//!
//! `NodeId` is the composite address of one processing step: the chain it
//! belongs to plus the node's slot in that chain's arena. It is `Copy`, cheap
//! to compare, and survives as a string key (`to_key`/`from_key`) for widget
//! toolkits that address rows by string.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A chain identifier (UUIDv7). One per editing chain, minted at load time.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(uuid::Uuid);

impl ChainId {
    /// Create a new time-ordered ID (UUIDv7).
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// First 8 hex characters — for human display only, not lookup.
    pub fn short(&self) -> String {
        self.0.as_simple().to_string()[..8].to_string()
    }

    /// Full 32-character hex string (no hyphens).
    pub fn to_hex(&self) -> String {
        self.0.as_simple().to_string()
    }

    /// Parse from a hex string (32 chars, no hyphens) or standard UUID format.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}

impl Default for ChainId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<uuid::Uuid> for ChainId {
    fn from(u: uuid::Uuid) -> Self {
        Self(u)
    }
}

impl From<ChainId> for uuid::Uuid {
    fn from(id: ChainId) -> uuid::Uuid {
        id.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Full UUID with hyphens for log readability
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainId({})", self.short())
    }
}

// ── Node addressing ─────────────────────────────────────────────────────────

/// Globally unique address of one processing node.
///
/// Composed of:
/// - `chain`: the chain this node belongs to
/// - `index`: the node's slot in the chain's arena (root is always 0)
///
/// Handles are only minted by the tree that owns the arena, so a `NodeId`
/// whose `chain` matches the live chain is guaranteed to resolve. Handles
/// from an earlier chain fail the `chain` comparison instead of silently
/// resolving to an unrelated node at the same slot.
/// UUIDs are hex-only, so `to_key()` / `from_key()` need no escaping.
#[derive(Clone, Copy, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct NodeId {
    /// Chain this node belongs to.
    pub chain: ChainId,
    /// Arena slot within the chain.
    ///
    /// Assigned by the tree at append time, monotonically increasing. A
    /// node's slot is always greater than its parent's, which is what makes
    /// upward walks finite without a depth circuit breaker.
    pub index: u32,
}

impl NodeId {
    /// Create a node ID from its components.
    pub fn new(chain: ChainId, index: u32) -> Self {
        Self { chain, index }
    }

    /// Convert to a compact string key: `"{chain_hex}:{index}"`.
    ///
    /// Uses `:` as delimiter — safe because UUIDs are hex-only. Widget
    /// toolkits that key tree rows by string can store this and hand it
    /// back through `from_key`.
    pub fn to_key(&self) -> String {
        format!("{}:{}", self.chain.to_hex(), self.index)
    }

    /// Parse from key string: `"{chain_hex}:{index}"`.
    pub fn from_key(key: &str) -> Option<Self> {
        let (chain, index) = key.split_once(':')?;
        let chain = ChainId::parse(chain).ok()?;
        let index: u32 = index.parse().ok()?;
        Some(Self { chain, index })
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.chain.short(), self.index)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}#{})", self.chain.short(), self.index)
    }
}

// ============================================================================
// Tests
// ============================================================================
