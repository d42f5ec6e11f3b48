/// Context is executing its task.
pub(crate) const RUNNING: usize = 0;

/// Context is suspended inside `await_future`, waiting to be resumed.
pub(crate) const PARKED: usize = 1;

/// Context's task has returned or failed. Terminal.
pub(crate) const TERMINATED: usize = 2;

/// Observable lifecycle state of an execution context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContextState {
    /// The context is executing.
    Running,

    /// The context is parked on a completion bridge.
    Parked,

    /// The context's task has finished. The context will not run again.
    Terminated,
}

impl ContextState {
    /// Decodes the raw state stored in the context.
    pub(crate) fn from_raw(raw: usize) -> Self {
        match raw {
            RUNNING => Self::Running,
            PARKED => Self::Parked,
            _ => Self::Terminated,
        }
    }
}
