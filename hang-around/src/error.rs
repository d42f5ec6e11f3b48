//! Error types shared across the crate.
//!
//! - [`AwaitError`] is returned by [`await_future`](crate::await_future).
//! - [`TaskFailure`] describes a failure that escaped a context's task.
//! - [`SpawnError`] is returned when the OS refuses to create a context.
//! - [`AlreadyInitialized`] guards the process-wide, set-once settings.

use crate::future::Failure;
use crate::runtime::context::ContextId;

use std::any::Any;
use std::error::Error;
use std::io;

/// A type-erased, thread-safe error.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Errors produced by [`await_future`](crate::await_future).
#[derive(Debug, thiserror::Error)]
pub enum AwaitError {
    /// `await_future` was called from a thread that is not an
    /// await-capable context.
    ///
    /// Raised before anything is registered on the awaited future.
    #[error("await called outside an await-capable context")]
    OutsideContext,

    /// The context was interrupted before the awaited future completed.
    ///
    /// The future's outcome, if it ever arrives, is dropped.
    #[error("context {0} was interrupted while awaiting")]
    Interrupted(ContextId),

    /// The future failed with a runtime-style cause, returned unchanged.
    #[error(transparent)]
    Unchecked(BoxError),

    /// The future failed with a checked cause, wrapped. The original
    /// cause is available through [`Error::source`].
    #[error("awaited future failed: {0}")]
    Wrapped(#[source] BoxError),
}

impl AwaitError {
    /// Returns the failure cause carried by a propagated failure.
    ///
    /// For [`Unchecked`](Self::Unchecked) this is the error itself, for
    /// [`Wrapped`](Self::Wrapped) the inner cause. Other variants have none.
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        match self {
            Self::Unchecked(cause) | Self::Wrapped(cause) => Some(cause.as_ref()),
            Self::OutsideContext | Self::Interrupted(_) => None,
        }
    }

    /// Consumes the error and returns the carried failure cause, if any.
    pub fn into_cause(self) -> Option<BoxError> {
        match self {
            Self::Unchecked(cause) | Self::Wrapped(cause) => Some(cause),
            Self::OutsideContext | Self::Interrupted(_) => None,
        }
    }

    /// Returns `true` if the context was interrupted while awaiting.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted(_))
    }
}

impl From<Failure> for AwaitError {
    /// Runtime-style causes pass through untouched, checked ones are wrapped.
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::Unchecked(cause) => Self::Unchecked(cause),
            Failure::Checked(cause) => Self::Wrapped(cause),
        }
    }
}

/// A failure that escaped the task running on a context.
#[derive(Debug, thiserror::Error)]
pub enum TaskFailure {
    /// The task returned an error.
    #[error("task failed: {0}")]
    Failed(#[source] BoxError),

    /// The task panicked. Carries the panic message when it was a string.
    #[error("task panicked: {0}")]
    Panicked(String),
}

impl TaskFailure {
    /// Builds a failure from a payload caught by `catch_unwind`.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&'static str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "non-string panic payload".to_string()
        };

        Self::Panicked(message)
    }
}

/// The OS refused to create a new execution context.
#[derive(Debug, thiserror::Error)]
#[error("failed to spawn context `{name}`")]
pub struct SpawnError {
    pub(crate) name: String,

    #[source]
    pub(crate) source: io::Error,
}

impl SpawnError {
    /// Name the context would have had.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A process-wide setting was initialized twice.
#[derive(Debug, thiserror::Error)]
#[error("{0} is already initialized")]
pub struct AlreadyInitialized(pub(crate) &'static str);
