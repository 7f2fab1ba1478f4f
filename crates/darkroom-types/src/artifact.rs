//! Opaque image artifacts — the payload every processing node carries.
//!
//! An [`Artifact`] is an immutable, reference-counted byte buffer. The history
//! tree never inspects the bytes: decoding, color conversion, and every other
//! pixel-level concern stays behind the operation layer. What the tree *does*
//! care about is identity: a node's input must be **the same buffer** its
//! parent produced, not a lookalike copy. Cloning an `Artifact` clones the
//! handle, never the pixels, so that identity is exactly `Arc` pointer
//! equality ([`Artifact::same_data`]).
//!
//! There is deliberately no `PartialEq`: equality by content and equality by
//! identity mean different things here, and picking one silently would hide
//! bugs in whichever caller wanted the other.

use std::fmt;
use std::sync::Arc;

/// An immutable image buffer, shared by handle.
#[derive(Clone)]
pub struct Artifact(Arc<[u8]>);

impl Artifact {
    /// Wrap an owned buffer. No copy.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self(Arc::from(bytes))
    }

    /// Copy a borrowed buffer into a new artifact.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(Arc::from(bytes))
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Buffer length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if both handles point at the same underlying buffer.
    ///
    /// This is identity, not content comparison: two artifacts built from
    /// byte-identical vectors are still distinct.
    pub fn same_data(&self, other: &Artifact) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Number of handles sharing this buffer (for diagnostics).
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl From<Vec<u8>> for Artifact {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_vec(bytes)
    }
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never dump pixels into logs; length and address identify the buffer.
        write!(f, "Artifact({} bytes @ {:p})", self.0.len(), self.0.as_ptr())
    }
}

// ============================================================================
// Tests
// ============================================================================
