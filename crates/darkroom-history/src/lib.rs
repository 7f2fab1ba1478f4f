//! Branching processing-history engine for Darkroom.
//!
//! Every image-editing session is a tree: load an image (the root), apply
//! operations (children), go back to an earlier result and apply something
//! else (a branch). This crate owns that tree and the pointer semantics
//! that make it feel like an editor history rather than a bare data
//! structure.
//!
//! # Design Philosophy
//!
//! History is structured as nodes, not a flat undo stack. This enables:
//! - Branching (reselect an earlier step, continue from there)
//! - Full provenance per step (input, output, operation, timestamp)
//! - Tree widgets rendered straight from a depth-first walk
//! - Cheap snapshots — artifacts are shared by handle, never copied
//!
//! # Layers
//!
//! - [`HistoryTree`] — arena-owned nodes, shape guarantees, traversal
//! - [`HistoryEngine`] — at most one tree plus the current/selected pointers
//! - [`ImageProcessor`] — runs [`ImageOp`]s and records the results
//!
//! Applications drive the processor (or the engine directly), render from
//! the read surface, and keep pixel algorithms behind the [`ImageOp`]
//! trait. Nothing in this crate decodes or inspects image bytes.

mod engine;
mod error;
mod node;
mod processor;
mod tree;

pub use engine::HistoryEngine;
pub use error::{HistoryError, ProcessError};
pub use node::ProcessingNode;
pub use processor::{BoxError, ImageOp, ImageProcessor};
pub use tree::HistoryTree;

// Re-export the vocabulary crate so callers need only one `use`.
pub use darkroom_types::{Artifact, ChainId, NodeId, OpParams, OpRecord, ORIGINAL_OP};

/// Result type for history operations.
pub type Result<T> = std::result::Result<T, HistoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(byte: u8) -> Artifact {
        Artifact::from_vec(vec![byte; 8])
    }

    #[test]
    fn test_session_with_two_branches() {
        let mut engine = HistoryEngine::new();
        let root = engine.start_chain("/shoot/raw_0001.png", artifact(0));

        // Linear edits first.
        let gray = engine.record_step(artifact(1), OpRecord::new("Grayscale")).unwrap();
        let blur = engine.record_step(artifact(2), OpRecord::new("Blur")).unwrap();

        // Back up to the grayscale result and try a different finish.
        engine.select(gray).unwrap();
        let sharpen = engine.record_step(artifact(3), OpRecord::new("Sharpen")).unwrap();

        // And a third branch straight off the original.
        engine.select(root).unwrap();
        let rgb = engine.record_step(artifact(4), OpRecord::new("RGB")).unwrap();

        let tree = engine.tree().unwrap();
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.children(root), &[gray, rgb]);
        assert_eq!(tree.children(gray), &[blur, sharpen]);

        // The listing follows whichever branch is current.
        let names: Vec<&str> = engine.current_chain().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Original", "RGB"]);

        // The abandoned branch is still fully listable.
        let names: Vec<&str> = tree.chain(sharpen).iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Original", "Grayscale", "Sharpen"]);
    }

    #[test]
    fn test_widget_roundtrip_through_string_keys() {
        // Tree widgets store rows keyed by string and hand the key back on
        // click. Simulate that: walk the tree, stash keys, select by key.
        let mut engine = HistoryEngine::new();
        let root = engine.start_chain("/shoot/raw_0002.png", artifact(0));
        engine.record_step(artifact(1), OpRecord::new("Grayscale")).unwrap();

        let keys: Vec<String> = engine
            .tree()
            .unwrap()
            .iter_dfs()
            .map(|(_, node)| node.id().to_key())
            .collect();
        assert_eq!(keys.len(), 2);

        let clicked = NodeId::from_key(&keys[0]).unwrap();
        engine.select(clicked).unwrap();
        assert_eq!(engine.selected(), Some(root));
        assert_eq!(engine.active_node().unwrap().id(), root);
    }

    #[test]
    fn test_chain_timestamps_read_in_order() {
        let mut engine = HistoryEngine::new();
        engine.start_chain("/shoot/raw_0003.png", artifact(0));
        for i in 0..4u8 {
            engine.record_step(artifact(i), OpRecord::new(format!("Op{i}"))).unwrap();
        }

        let chain = engine.current_chain();
        for pair in chain.windows(2) {
            assert!(pair[0].timestamp_ms <= pair[1].timestamp_ms);
        }
    }
}
