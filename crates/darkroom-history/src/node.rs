//! Processing nodes — one immutable step each.
//!
//! A node records what one operation did: the artifact it started from, the
//! artifact it produced, and the [`OpRecord`] describing the step. Linkage
//! (parent, children) is owned by the tree; nodes are created already
//! attached, which is why the constructors live behind `pub(crate)`. There
//! is no way to build a floating node and attach it later, and no way to
//! attach the same node twice.
//!
//! Nodes never change after creation except for one thing: the parent's
//! child list grows when a new step derives from it.

use std::path::{Path, PathBuf};

use darkroom_types::{Artifact, NodeId, OpRecord};

/// One processing step in a chain.
///
/// The root node is the unmodified load: no parent, no input, and the
/// `source_path` of the file it came from. Every other node has exactly one
/// parent, and its input is **the same buffer** (handle identity, not a
/// copy) as that parent's output.
#[derive(Debug, Clone)]
pub struct ProcessingNode {
    id: NodeId,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    input: Option<Artifact>,
    output: Artifact,
    op: OpRecord,
    source_path: Option<PathBuf>,
}

impl ProcessingNode {
    /// Build a chain root. Only the tree calls this.
    pub(crate) fn root(id: NodeId, output: Artifact, op: OpRecord, source_path: PathBuf) -> Self {
        debug_assert!(id.index == 0, "root must occupy arena slot 0");
        Self {
            id,
            parent: None,
            children: Vec::new(),
            input: None,
            output,
            op,
            source_path: Some(source_path),
        }
    }

    /// Build a derived step. Only the tree calls this, with `input` already
    /// snapshotted from the parent's output.
    pub(crate) fn child(
        id: NodeId,
        parent: NodeId,
        input: Artifact,
        output: Artifact,
        op: OpRecord,
    ) -> Self {
        debug_assert!(
            parent.chain == id.chain,
            "parent must be in the same chain as the node"
        );
        debug_assert!(
            parent.index < id.index,
            "parent must occupy an earlier arena slot"
        );
        Self {
            id,
            parent: Some(parent),
            children: Vec::new(),
            input: Some(input),
            output,
            op,
            source_path: None,
        }
    }

    /// Record a newly attached child, in creation order.
    pub(crate) fn record_child(&mut self, child: NodeId) {
        debug_assert!(
            !self.children.contains(&child),
            "child recorded twice on the same parent"
        );
        self.children.push(child);
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// This node's address.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The parent node, `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in creation order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The artifact this step started from, `None` for the root.
    pub fn input(&self) -> Option<&Artifact> {
        self.input.as_ref()
    }

    /// The artifact this step produced. Never absent: a node exists only
    /// once its operation has completed.
    pub fn output(&self) -> &Artifact {
        &self.output
    }

    /// The operation that produced this node.
    pub fn op(&self) -> &OpRecord {
        &self.op
    }

    /// Where the pixels originally came from. Set on roots only.
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Check if this is the chain root (no parent).
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Check if this node has no children yet.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
