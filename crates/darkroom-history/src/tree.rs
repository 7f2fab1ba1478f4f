//! The history tree: arena-owned nodes with efficient traversal.
//!
//! One tree per loaded image. Nodes live in a `Vec` arena owned by the tree;
//! the outside world holds [`NodeId`] handles and resolves them here. A
//! child always occupies a later arena slot than its parent, so upward walks
//! terminate structurally and no cycle guard is needed anywhere in this
//! module.
//!
//! The tree knows nothing about "current" or "selected" — those pointers
//! belong to the engine. This layer only guarantees shape: exactly one root,
//! every other node reachable from it, and each child's input being the
//! very buffer its parent produced.

use std::path::PathBuf;

use darkroom_types::{Artifact, ChainId, NodeId, OpRecord};

use crate::{HistoryError, ProcessingNode, Result};

/// A branching tree of processing steps for one source image.
#[derive(Debug, Clone)]
pub struct HistoryTree {
    /// Chain identity, embedded in every handle this tree mints.
    chain: ChainId,
    /// Arena. Slot 0 is always the root.
    nodes: Vec<ProcessingNode>,
}

impl HistoryTree {
    /// Create a tree around a freshly loaded image.
    ///
    /// The root node is built immediately: a tree is never rootless.
    pub fn new(source_path: impl Into<PathBuf>, original: Artifact, op: OpRecord) -> Self {
        let chain = ChainId::new();
        let root = ProcessingNode::root(NodeId::new(chain, 0), original, op, source_path.into());
        Self {
            chain,
            nodes: vec![root],
        }
    }

    /// Append a new step under `parent`.
    ///
    /// The child's input is snapshotted from the parent's output (handle
    /// identity, not a copy), and its timestamp is bumped to the parent's
    /// if the wall clock stepped backwards between the two steps.
    pub fn append(&mut self, parent: NodeId, output: Artifact, mut op: OpRecord) -> Result<NodeId> {
        let Some(parent_node) = self.get(parent) else {
            return Err(HistoryError::UnknownNode {
                chain: self.chain,
                id: parent,
            });
        };

        let input = parent_node.output().clone();
        let parent_ts = parent_node.op().timestamp_ms;
        if op.timestamp_ms < parent_ts {
            tracing::debug!(
                parent = %parent,
                behind_ms = parent_ts - op.timestamp_ms,
                "clock stepped backwards; clamping step timestamp to parent's"
            );
            op.timestamp_ms = parent_ts;
        }

        debug_assert!(self.nodes.len() < u32::MAX as usize, "arena slot overflow");
        let id = NodeId::new(self.chain, self.nodes.len() as u32);
        self.nodes
            .push(ProcessingNode::child(id, parent, input, output, op));
        self.nodes[parent.index as usize].record_child(id);

        tracing::debug!(node = %id, parent = %parent, op = %self.nodes[id.index as usize].op(), "appended step");
        Ok(id)
    }

    // ── Lookup ──────────────────────────────────────────────────────────

    /// The chain this tree belongs to.
    pub fn chain_id(&self) -> ChainId {
        self.chain
    }

    /// Check whether a handle resolves in this tree.
    pub fn contains(&self, id: NodeId) -> bool {
        id.chain == self.chain && (id.index as usize) < self.nodes.len()
    }

    /// Get a node by handle.
    pub fn get(&self, id: NodeId) -> Option<&ProcessingNode> {
        if id.chain != self.chain {
            return None;
        }
        self.nodes.get(id.index as usize)
    }

    /// The root node.
    pub fn root(&self) -> &ProcessingNode {
        &self.nodes[0]
    }

    /// The root's handle.
    pub fn root_id(&self) -> NodeId {
        NodeId::new(self.chain, 0)
    }

    /// Total number of nodes (at least 1).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Children of a node, in creation order. Empty for unknown handles.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children()).unwrap_or(&[])
    }

    // ── Traversal ───────────────────────────────────────────────────────

    /// Ancestors of a node, from immediate parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<&ProcessingNode> {
        let mut result = Vec::new();
        let mut current = self.get(id);

        while let Some(node) = current {
            if let Some(parent_id) = node.parent() {
                // Parent slots are strictly decreasing, so this terminates.
                let parent = &self.nodes[parent_id.index as usize];
                result.push(parent);
                current = Some(parent);
            } else {
                break;
            }
        }

        result
    }

    /// The operation records along the path ending at `id`: root first,
    /// `id`'s own record last.
    ///
    /// This is what a chain listing shows. Branches hanging off the path
    /// are not included. Empty for unknown handles.
    pub fn chain(&self, id: NodeId) -> Vec<&OpRecord> {
        let Some(node) = self.get(id) else {
            return Vec::new();
        };

        let mut result: Vec<&OpRecord> = self.ancestors(id).into_iter().map(|n| n.op()).collect();
        result.reverse();
        result.push(node.op());
        result
    }

    /// Depth of a node (0 for the root, 0 for unknown handles).
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).len()
    }

    /// Iterate nodes in depth-first order.
    ///
    /// Returns (depth, node) pairs where the root has depth 0. Children are
    /// visited in creation order, each subtree fully before the next
    /// sibling — the order a tree widget inserts its rows.
    pub fn iter_dfs(&self) -> impl Iterator<Item = (usize, &ProcessingNode)> {
        DfsIterator::new(self)
    }
}

/// Depth-first iterator over tree nodes.
struct DfsIterator<'a> {
    tree: &'a HistoryTree,
    stack: Vec<(usize, NodeId)>,
}

impl<'a> DfsIterator<'a> {
    fn new(tree: &'a HistoryTree) -> Self {
        Self {
            tree,
            stack: vec![(0, tree.root_id())],
        }
    }
}

impl<'a> Iterator for DfsIterator<'a> {
    type Item = (usize, &'a ProcessingNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, id) = self.stack.pop()?;
        let node = &self.tree.nodes[id.index as usize];
        // Push children in reverse so the first child is visited first.
        for child in node.children().iter().rev() {
            self.stack.push((depth + 1, *child));
        }
        Some((depth, node))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(byte: u8) -> Artifact {
        Artifact::from_vec(vec![byte; 8])
    }

    fn test_tree() -> HistoryTree {
        HistoryTree::new("/photos/cat.png", artifact(0), OpRecord::original())
    }

    #[test]
    fn test_new_tree_has_root() {
        let tree = test_tree();

        assert_eq!(tree.node_count(), 1);
        assert!(tree.contains(tree.root_id()));
        assert!(tree.root().is_root());
        assert!(tree.root().op().is_original());
        assert_eq!(tree.depth(tree.root_id()), 0);
    }

    #[test]
    fn test_append_links_both_directions() {
        let mut tree = test_tree();
        let root = tree.root_id();

        let child = tree.append(root, artifact(1), OpRecord::new("Grayscale")).unwrap();

        assert_eq!(tree.get(child).unwrap().parent(), Some(root));
        assert_eq!(tree.children(root), &[child]);
    }

    #[test]
    fn test_append_snapshots_parent_output_as_input() {
        let mut tree = test_tree();
        let root = tree.root_id();

        let child = tree.append(root, artifact(1), OpRecord::new("RGB")).unwrap();
        let grandchild = tree.append(child, artifact(2), OpRecord::new("Blur")).unwrap();

        let root_out = tree.root().output().clone();
        assert!(tree.get(child).unwrap().input().unwrap().same_data(&root_out));

        let child_out = tree.get(child).unwrap().output().clone();
        assert!(tree.get(grandchild).unwrap().input().unwrap().same_data(&child_out));
    }

    #[test]
    fn test_append_rejects_foreign_handle() {
        let mut tree = test_tree();
        let other = test_tree();

        let err = tree
            .append(other.root_id(), artifact(1), OpRecord::new("RGB"))
            .unwrap_err();
        assert!(matches!(err, HistoryError::UnknownNode { .. }));

        // Right chain, slot never minted.
        let bogus = NodeId::new(tree.chain_id(), 99);
        assert!(tree.append(bogus, artifact(1), OpRecord::new("RGB")).is_err());
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_branch_children_in_creation_order() {
        let mut tree = test_tree();
        let root = tree.root_id();

        let a = tree.append(root, artifact(1), OpRecord::new("Grayscale")).unwrap();
        let b = tree.append(root, artifact(2), OpRecord::new("RGB")).unwrap();

        assert_eq!(tree.children(root), &[a, b]);
        // Both branches share the same input buffer.
        let root_out = tree.root().output().clone();
        assert!(tree.get(a).unwrap().input().unwrap().same_data(&root_out));
        assert!(tree.get(b).unwrap().input().unwrap().same_data(&root_out));
    }

    #[test]
    fn test_chain_is_root_first_and_excludes_siblings() {
        let mut tree = test_tree();
        let root = tree.root_id();

        let gray = tree.append(root, artifact(1), OpRecord::new("Grayscale")).unwrap();
        let _rgb = tree.append(root, artifact(2), OpRecord::new("RGB")).unwrap();
        let blur = tree.append(gray, artifact(3), OpRecord::new("Blur")).unwrap();

        let names: Vec<&str> = tree.chain(blur).iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Original", "Grayscale", "Blur"]);
        assert_eq!(tree.chain(blur).len(), tree.depth(blur) + 1);
    }

    #[test]
    fn test_chain_of_root_is_just_root() {
        let tree = test_tree();
        let chain = tree.chain(tree.root_id());
        assert_eq!(chain.len(), 1);
        assert!(chain[0].is_original());
    }

    #[test]
    fn test_chain_of_unknown_is_empty() {
        let tree = test_tree();
        let other = test_tree();
        assert!(tree.chain(other.root_id()).is_empty());
        assert!(tree.children(other.root_id()).is_empty());
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let mut tree = test_tree();
        let root = tree.root_id();
        let a = tree.append(root, artifact(1), OpRecord::new("A")).unwrap();
        let b = tree.append(a, artifact(2), OpRecord::new("B")).unwrap();

        let ancestors = tree.ancestors(b);
        assert_eq!(ancestors.len(), 2);
        assert_eq!(ancestors[0].id(), a);
        assert_eq!(ancestors[1].id(), root);

        assert!(tree.ancestors(root).is_empty());
    }

    #[test]
    fn test_depth() {
        let mut tree = test_tree();
        let root = tree.root_id();
        let a = tree.append(root, artifact(1), OpRecord::new("A")).unwrap();
        let b = tree.append(a, artifact(2), OpRecord::new("B")).unwrap();
        let side = tree.append(root, artifact(3), OpRecord::new("C")).unwrap();

        assert_eq!(tree.depth(root), 0);
        assert_eq!(tree.depth(a), 1);
        assert_eq!(tree.depth(b), 2);
        assert_eq!(tree.depth(side), 1);
    }

    #[test]
    fn test_dfs_visits_subtree_before_sibling() {
        let mut tree = test_tree();
        let root = tree.root_id();
        let a = tree.append(root, artifact(1), OpRecord::new("A")).unwrap();
        let a1 = tree.append(a, artifact(2), OpRecord::new("A1")).unwrap();
        let b = tree.append(root, artifact(3), OpRecord::new("B")).unwrap();

        let order: Vec<(usize, NodeId)> = tree.iter_dfs().map(|(d, n)| (d, n.id())).collect();
        assert_eq!(order, vec![(0, root), (1, a), (2, a1), (1, b)]);
    }

    #[test]
    fn test_timestamp_clamped_to_parent() {
        let mut tree = test_tree();
        let root = tree.root_id();
        let root_ts = tree.root().op().timestamp_ms;

        // Simulate a wall clock that stepped backwards.
        let mut op = OpRecord::new("Grayscale");
        op.timestamp_ms = root_ts.saturating_sub(5_000);

        let child = tree.append(root, artifact(1), op).unwrap();
        assert_eq!(tree.get(child).unwrap().op().timestamp_ms, root_ts);
    }

    #[test]
    fn test_timestamps_never_decrease_along_chains() {
        let mut tree = test_tree();
        let root = tree.root_id();
        let a = tree.append(root, artifact(1), OpRecord::new("A")).unwrap();
        let b = tree.append(a, artifact(2), OpRecord::new("B")).unwrap();

        let chain = tree.chain(b);
        for pair in chain.windows(2) {
            assert!(pair[0].timestamp_ms <= pair[1].timestamp_ms);
        }
    }

    // ── Randomized shape check ──────────────────────────────────────────

    #[test]
    fn test_random_append_sequence_preserves_invariants() {
        use rand::Rng;
        let mut rng = rand::thread_rng();

        let mut tree = test_tree();
        let mut ids = vec![tree.root_id()];

        for i in 0..200u8 {
            let parent = ids[rng.gen_range(0..ids.len())];
            let id = tree
                .append(parent, artifact(i), OpRecord::new(format!("Op{i}")))
                .unwrap();
            ids.push(id);
        }

        assert_eq!(tree.node_count(), 201);

        let mut roots = 0;
        for (_, node) in tree.iter_dfs() {
            match node.parent() {
                None => roots += 1,
                Some(parent) => {
                    // Parent lists this node as a child.
                    assert!(tree.children(parent).contains(&node.id()));
                    // Input is the parent's output, by handle identity.
                    let parent_out = tree.get(parent).unwrap().output();
                    assert!(node.input().unwrap().same_data(parent_out));
                    // Timestamps never run backwards.
                    assert!(tree.get(parent).unwrap().op().timestamp_ms <= node.op().timestamp_ms);
                }
            }
        }
        assert_eq!(roots, 1);

        // DFS reaches every node exactly once.
        assert_eq!(tree.iter_dfs().count(), tree.node_count());
    }
}
