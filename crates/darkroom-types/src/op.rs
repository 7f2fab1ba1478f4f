//! Operation records — what happened at each step, and when.
//!
//! Every node in the history tree carries one [`OpRecord`]: the operation's
//! display name, a Unix-millisecond timestamp, and optional parameters. The
//! record is pure metadata. It names the step for chain listings and tree
//! widgets; it never re-runs anything.
//!
//! Parameters are an ordered `name -> JSON value` map ([`OpParams`]) so a
//! parameter panel renders them in the order the operation declared them,
//! not alphabetized or hash-shuffled.
//!
//! The root of every chain carries the well-known `"Original"` record
//! ([`OpRecord::original`]) marking the unmodified load.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Operation name reserved for chain roots.
pub const ORIGINAL_OP: &str = "Original";

/// Ordered operation parameters, as shown in the UI.
pub type OpParams = IndexMap<String, serde_json::Value>;

/// Metadata describing one processing step.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OpRecord {
    /// Display name of the operation ("Grayscale", "RGB", ...).
    pub name: String,
    /// When the step was recorded, in Unix milliseconds.
    ///
    /// Stamped at construction. The tree may bump this forward to keep
    /// chains chronologically ordered when the wall clock steps backwards.
    pub timestamp_ms: u64,
    /// Operation parameters, in declaration order. `None` for parameterless
    /// operations (and for `"Original"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<OpParams>,
}

impl OpRecord {
    /// Record a parameterless operation, stamped now.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        debug_assert!(!name.is_empty(), "operation name must not be empty");
        Self {
            name,
            timestamp_ms: crate::now_millis(),
            params: None,
        }
    }

    /// Record an operation with parameters, stamped now.
    pub fn with_params(name: impl Into<String>, params: OpParams) -> Self {
        let mut rec = Self::new(name);
        rec.params = Some(params);
        rec
    }

    /// The record every chain root carries: the unmodified loaded image.
    pub fn original() -> Self {
        Self::new(ORIGINAL_OP)
    }

    /// True if this is a root record.
    pub fn is_original(&self) -> bool {
        self.name == ORIGINAL_OP
    }
}

impl std::fmt::Display for OpRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

// ============================================================================
// Tests
// ============================================================================
