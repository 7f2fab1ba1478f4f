//! Shared identity, artifact, and operation types for Darkroom.
//!
//! This crate is the vocabulary of the processing-history tree: typed IDs,
//! the opaque image artifact handle, and operation records. It has **no
//! internal darkroom dependencies** — a pure leaf crate that the history
//! engine builds on.
//!
//! # Entity-Relationship Overview
//!
//! ```text
//! Chain (ChainId) ← one loaded image and everything derived from it
//!     └── root node is the unmodified load ("Original")
//!     └── every later node derives from exactly one parent
//!
//! Node (NodeId = ChainId + arena slot)
//!     └── carries input/output Artifacts (handles, identity-compared)
//!     └── carries an OpRecord (name + timestamp + ordered params)
//! ```
//!
//! # Key Types
//!
//! |--------------|-------------------------------------------------|
//! | Type         | Purpose                                         |
//! |--------------|-------------------------------------------------|
//! | [`ChainId`]  | Which editing chain (minted per image load)     |
//! | [`NodeId`]   | Unique node address (chain + slot)              |
//! | [`Artifact`] | Immutable shared image buffer                   |
//! | [`OpRecord`] | What happened at a step, when, with what params |
//! |--------------|-------------------------------------------------|

pub mod artifact;
pub mod ids;
pub mod op;

// Re-export primary types at crate root for convenience.
pub use artifact::Artifact;
pub use ids::{ChainId, NodeId};
pub use op::{OpParams, OpRecord, ORIGINAL_OP};

/// Current time as Unix milliseconds. Used by constructors throughout the crate.
pub(crate) fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
