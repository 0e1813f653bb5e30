//! # Shared Execution Graph
//!
//! Per-run synchronization wrapper. Task lifecycle handlers run
//! concurrently (one per active task, completion events arrive
//! asynchronously from workers), and every mutation or trigger-decision
//! read must be serialized per workflow instance. One mutex per run is
//! sufficient; cross-run parallelism is unrestricted.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use uuid::Uuid;

use super::ExecutionGraph;

#[derive(Debug, Clone)]
pub struct SharedExecutionGraph {
    inner: Arc<Mutex<ExecutionGraph>>,
}

impl SharedExecutionGraph {
    pub fn new(graph: ExecutionGraph) -> Self {
        Self {
            inner: Arc::new(Mutex::new(graph)),
        }
    }

    /// Acquire the per-run lock. No graph operation blocks on I/O, so
    /// holders release quickly.
    pub fn lock(&self) -> MutexGuard<'_, ExecutionGraph> {
        self.inner.lock()
    }

    /// Run a closure under the per-run lock
    pub fn with<R>(&self, f: impl FnOnce(&mut ExecutionGraph) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub fn run_id(&self) -> Uuid {
        self.inner.lock().run_id()
    }
}

impl From<ExecutionGraph> for SharedExecutionGraph {
    fn from(graph: ExecutionGraph) -> Self {
        Self::new(graph)
    }
}
