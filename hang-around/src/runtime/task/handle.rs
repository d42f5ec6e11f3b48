use crate::error::TaskFailure;
use crate::runtime::context::{ContextHandle, ContextId};

use std::thread;

/// A handle to a spawned execution context.
///
/// Exposes the context's identity and state, lets the caller interrupt it,
/// and allows waiting for its task to finish.
///
/// Dropping the `JoinHandle` does **not** stop the context; it only
/// discards the ability to join it.
#[derive(Debug)]
pub struct JoinHandle {
    pub(crate) context: ContextHandle,
    pub(crate) thread: thread::JoinHandle<Result<(), TaskFailure>>,
}

impl JoinHandle {
    /// Returns the handle of the spawned context.
    pub fn context(&self) -> &ContextHandle {
        &self.context
    }

    /// Returns the identity of the spawned context.
    pub fn id(&self) -> ContextId {
        self.context.id()
    }

    /// Interrupts the spawned context. See [`ContextHandle::interrupt`].
    pub fn interrupt(&self) {
        self.context.interrupt();
    }

    /// Returns `true` once the context's task has finished.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Blocks the calling thread until the context terminates.
    ///
    /// Returns the failure that escaped the task, if any. By the time it is
    /// returned here it has already been reported to the uncaught failure
    /// sink.
    pub fn join(self) -> Result<(), TaskFailure> {
        match self.thread.join() {
            Ok(result) => result,
            // Only reachable if the sink itself panicked.
            Err(payload) => Err(TaskFailure::from_panic(payload)),
        }
    }
}
