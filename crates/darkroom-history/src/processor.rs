//! Image-processing facade: run an operation, record the step.
//!
//! [`ImageProcessor`] is the glue between operations and history. An
//! operation is anything implementing [`ImageOp`]: it names itself,
//! optionally declares parameters, and turns one artifact into another.
//! The processor feeds it the active node's output, and on success records
//! the result as a new step. A failing operation records nothing.
//!
//! Operations can also be registered by name and invoked with
//! [`ImageProcessor::apply_named`], which is how menu entries dispatch.
//! The registry preserves registration order so menus list operations the
//! way the application declared them.
//!
//! Pixel work stays on the other side of the [`ImageOp`] boundary: this
//! crate never decodes, converts, or inspects image bytes.

use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;

use darkroom_types::{Artifact, NodeId, OpRecord};

use crate::{HistoryEngine, HistoryError, ProcessError};

/// Boxed error an operation may fail with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// One image operation, as the processor sees it.
pub trait ImageOp: Send + Sync {
    /// Display name, also the registry key ("Grayscale", "RGB", ...).
    fn name(&self) -> &str;

    /// Parameters to record on the step, in display order.
    ///
    /// `None` for parameterless operations.
    fn params(&self) -> Option<darkroom_types::OpParams> {
        None
    }

    /// Transform one artifact into another.
    fn apply(&self, input: &Artifact) -> std::result::Result<Artifact, BoxError>;
}

/// Facade driving the history engine through image operations.
pub struct ImageProcessor {
    engine: HistoryEngine,
    /// Registered operations, keyed by name, in registration order.
    ops: IndexMap<String, Arc<dyn ImageOp>>,
}

impl std::fmt::Debug for ImageProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageProcessor")
            .field("engine", &self.engine)
            .field("ops", &self.ops.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for ImageProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageProcessor {
    /// Create a processor with an empty engine and no registered ops.
    pub fn new() -> Self {
        Self {
            engine: HistoryEngine::new(),
            ops: IndexMap::new(),
        }
    }

    /// Register an operation under its own name.
    ///
    /// Re-registering a name replaces the previous operation but keeps its
    /// menu position.
    pub fn register(&mut self, op: Arc<dyn ImageOp>) {
        self.ops.insert(op.name().to_string(), op);
    }

    /// Registered operation names, in registration order.
    pub fn ops(&self) -> impl Iterator<Item = &str> {
        self.ops.keys().map(String::as_str)
    }

    /// Look up a registered operation.
    pub fn get_op(&self, name: &str) -> Option<Arc<dyn ImageOp>> {
        self.ops.get(name).cloned()
    }

    /// Begin a new chain around a decoded image.
    ///
    /// Decoding happens upstream; the loader hands the decoded buffer
    /// here together with the path it came from. Returns the root handle.
    pub fn load(&mut self, path: impl Into<PathBuf>, original: Artifact) -> NodeId {
        self.engine.start_chain(path, original)
    }

    /// Run an operation against the active node and record the result.
    ///
    /// The input is the active node's output (selected if set, else
    /// current), exactly the buffer the next step must derive from. If the
    /// operation fails, the history is left untouched.
    pub fn apply(&mut self, op: &dyn ImageOp) -> std::result::Result<NodeId, ProcessError> {
        let input = self
            .engine
            .active_node()
            .ok_or(HistoryError::NoActiveChain)?
            .output()
            .clone();

        let output = op.apply(&input).map_err(|source| ProcessError::Op {
            name: op.name().to_string(),
            source,
        })?;

        let record = match op.params() {
            Some(params) => OpRecord::with_params(op.name(), params),
            None => OpRecord::new(op.name()),
        };
        Ok(self.engine.record_step(output, record)?)
    }

    /// Run a registered operation by name.
    pub fn apply_named(&mut self, name: &str) -> std::result::Result<NodeId, ProcessError> {
        let op = self
            .get_op(name)
            .ok_or_else(|| ProcessError::UnknownOp(name.to_string()))?;
        self.apply(op.as_ref())
    }

    /// The engine, for reads (pointers, chains, tree rendering).
    pub fn engine(&self) -> &HistoryEngine {
        &self.engine
    }

    /// The engine, for selection changes and other direct drives.
    pub fn engine_mut(&mut self) -> &mut HistoryEngine {
        &mut self.engine
    }
}

// ============================================================================
// Tests
// ============================================================================
