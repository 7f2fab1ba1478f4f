//! The history engine: pointer semantics over the tree.
//!
//! The engine is what the rest of the application talks to. It owns at most
//! one [`HistoryTree`] and maintains the two pointers that give the tree its
//! editing semantics:
//!
//! - **current** — chronological tip, the most recently produced step.
//! - **selected** — explicit user choice of where the next step attaches,
//!   usually set by clicking a row in the history widget.
//!
//! New steps attach to *selected if set, else current*. Recording a step
//! moves both pointers to the new node, so plain sequential editing never
//! needs a selection at all; selecting an older node and continuing is what
//! forks a branch.
//!
//! # Lifecycle
//!
//! ```text
//! Empty ──start_chain──▶ Active ──start_chain──▶ Active (fresh tree)
//!   │                      │
//!   └── every other op     └── record_step / select / clear_selection /
//!       fails or returns       queries — pointers always resolve
//!       nothing
//! ```
//!
//! Loading a new image discards the previous chain wholesale. Handles from
//! the discarded chain carry the old [`ChainId`] and stop resolving.
//!
//! # Concurrency
//!
//! The engine is not internally synchronized; an application that shares it
//! across threads wraps it in its own lock. Nothing here blocks.

use std::path::PathBuf;

use darkroom_types::{Artifact, ChainId, NodeId, OpRecord};

use crate::{HistoryError, HistoryTree, ProcessingNode, Result};

/// The active chain plus its two pointers.
///
/// `current` always resolves; `selected` is validated on the way in and
/// only cleared by `clear_selection` or a fresh chain, so both pointers
/// are valid by construction whenever this struct exists.
#[derive(Debug, Clone)]
struct ActiveChain {
    tree: HistoryTree,
    current: NodeId,
    selected: Option<NodeId>,
}

impl ActiveChain {
    /// The node new steps attach to: selected if set, else current.
    fn attach_point(&self) -> NodeId {
        self.selected.unwrap_or(self.current)
    }
}

/// Engine managing the processing history of the loaded image.
#[derive(Debug, Clone, Default)]
pub struct HistoryEngine {
    active: Option<ActiveChain>,
}

impl HistoryEngine {
    /// Create an engine with no chain. Only [`start_chain`] is useful here.
    ///
    /// [`start_chain`]: HistoryEngine::start_chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a fresh chain around a newly loaded image.
    ///
    /// Any existing chain is discarded, along with its selection. The root
    /// node carries the `"Original"` record; both pointers start on it.
    /// Returns the root's handle.
    pub fn start_chain(&mut self, source_path: impl Into<PathBuf>, original: Artifact) -> NodeId {
        let source_path = source_path.into();
        let tree = HistoryTree::new(&source_path, original, OpRecord::original());
        let root = tree.root_id();

        if let Some(old) = &self.active {
            tracing::info!(
                old_chain = %old.tree.chain_id(),
                discarded_nodes = old.tree.node_count(),
                "discarding previous processing chain"
            );
        }
        tracing::info!(chain = %tree.chain_id(), path = %source_path.display(), "started processing chain");

        self.active = Some(ActiveChain {
            tree,
            current: root,
            selected: Some(root),
        });
        root
    }

    /// Record a completed processing step.
    ///
    /// The step attaches under the active node (selected if set, else
    /// current); attaching under a node that already has children forks a
    /// new branch. Afterwards both pointers reference the new node, so the
    /// next step continues from it unless the user selects elsewhere.
    ///
    /// Fails with [`HistoryError::NoActiveChain`] before any image is
    /// loaded; in that case nothing is recorded.
    pub fn record_step(&mut self, output: Artifact, op: OpRecord) -> Result<NodeId> {
        let chain = self.active_mut()?;
        let parent = chain.attach_point();
        let forked = !chain.tree.children(parent).is_empty();

        // Parent comes from our own pointers, so append cannot fail.
        let id = chain.tree.append(parent, output, op)?;
        chain.current = id;
        chain.selected = Some(id);

        if forked {
            tracing::debug!(parent = %parent, node = %id, "step forked a new branch");
        }
        Ok(id)
    }

    /// Operation records from the root to the current node, root first.
    ///
    /// Empty when no chain exists; otherwise the `"Original"` record leads
    /// and the current node's record closes. Siblings off the path do not
    /// appear.
    pub fn current_chain(&self) -> Vec<&OpRecord> {
        match &self.active {
            Some(chain) => chain.tree.chain(chain.current),
            None => Vec::new(),
        }
    }

    /// Point the selection at a node, making it the attachment point for
    /// the next step.
    ///
    /// The handle must resolve in the active chain; handles minted by a
    /// discarded chain fail with [`HistoryError::UnknownNode`] and leave
    /// the selection untouched.
    pub fn select(&mut self, id: NodeId) -> Result<()> {
        let chain = self.active_mut()?;
        if !chain.tree.contains(id) {
            return Err(HistoryError::UnknownNode {
                chain: chain.tree.chain_id(),
                id,
            });
        }
        tracing::debug!(node = %id, "selected node");
        chain.selected = Some(id);
        Ok(())
    }

    /// Drop the explicit selection; steps attach to the current node again.
    ///
    /// A no-op when nothing is selected or no chain exists.
    pub fn clear_selection(&mut self) {
        if let Some(chain) = &mut self.active {
            if chain.selected.take().is_some() {
                tracing::debug!("cleared selection");
            }
        }
    }

    /// The node the next step would attach to: selected if set, else
    /// current. `None` before any image is loaded.
    ///
    /// Every operation-triggering collaborator reads its input from this
    /// node's output.
    pub fn active_node(&self) -> Option<&ProcessingNode> {
        let chain = self.active.as_ref()?;
        // Both pointers are maintained by this engine, so this resolves.
        chain.tree.get(chain.attach_point())
    }

    // ── Read surface ────────────────────────────────────────────────────

    /// Check whether an image has been loaded.
    pub fn has_chain(&self) -> bool {
        self.active.is_some()
    }

    /// Identity of the active chain.
    pub fn chain_id(&self) -> Option<ChainId> {
        self.active.as_ref().map(|c| c.tree.chain_id())
    }

    /// Handle of the chain root.
    pub fn root(&self) -> Option<NodeId> {
        self.active.as_ref().map(|c| c.tree.root_id())
    }

    /// Handle of the chronological tip.
    pub fn current(&self) -> Option<NodeId> {
        self.active.as_ref().map(|c| c.current)
    }

    /// Handle of the explicit selection, if any.
    pub fn selected(&self) -> Option<NodeId> {
        self.active.as_ref().and_then(|c| c.selected)
    }

    /// Resolve a handle against the active chain.
    pub fn node(&self, id: NodeId) -> Option<&ProcessingNode> {
        self.active.as_ref().and_then(|c| c.tree.get(id))
    }

    /// The whole tree, for widgets that render every branch.
    pub fn tree(&self) -> Option<&HistoryTree> {
        self.active.as_ref().map(|c| &c.tree)
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn active_mut(&mut self) -> Result<&mut ActiveChain> {
        self.active.as_mut().ok_or(HistoryError::NoActiveChain)
    }
}

// ============================================================================
// Tests
// ============================================================================
