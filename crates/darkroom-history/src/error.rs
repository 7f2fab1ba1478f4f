//! Error types for history operations.

use thiserror::Error;

use darkroom_types::{ChainId, NodeId};

/// Errors that can occur while driving the history engine.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// A step or query was attempted before any image was loaded.
    ///
    /// Starting a chain is the only operation valid in this state.
    #[error("no active processing chain")]
    NoActiveChain,

    /// A node handle does not resolve in the active chain.
    ///
    /// Either the handle was minted by an earlier chain (chain mismatch)
    /// or it was never minted by this tree at all.
    #[error("node not found in chain {chain:?}: {id:?}")]
    UnknownNode { chain: ChainId, id: NodeId },
}

/// Errors from the image-processing facade.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The underlying history engine refused the operation.
    #[error(transparent)]
    History(#[from] HistoryError),

    /// No operation with this name is registered.
    #[error("unknown operation: {0}")]
    UnknownOp(String),

    /// The operation itself failed while transforming pixels.
    #[error("operation '{name}' failed: {source}")]
    Op {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
