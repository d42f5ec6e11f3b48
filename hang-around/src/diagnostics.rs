//! Reporting of failures that escape a context's task.
//!
//! Tasks launched with [`async_run`](crate::async_run) (and handlers that
//! [`async_handler`](crate::async_handler) moves onto a new context) have
//! nobody to return a failure to. Such failures are caught at the context
//! boundary and handed to a single, process-wide [`UncaughtSink`].
//!
//! The sink can be installed once with [`set_uncaught_sink`]. When none is
//! installed, failures are logged through `tracing` at error level by
//! [`TracingSink`].

use crate::error::{AlreadyInitialized, TaskFailure};
use crate::runtime::context::ContextHandle;

use std::sync::OnceLock;

static SINK: OnceLock<Box<dyn UncaughtSink>> = OnceLock::new();

/// Receives failures that escaped a context's task.
///
/// Called concurrently from many contexts, on the failing context's own
/// thread, right before that context terminates.
pub trait UncaughtSink: Send + Sync + 'static {
    fn report(&self, context: &ContextHandle, failure: &TaskFailure);
}

impl<F> UncaughtSink for F
where
    F: Fn(&ContextHandle, &TaskFailure) + Send + Sync + 'static,
{
    fn report(&self, context: &ContextHandle, failure: &TaskFailure) {
        self(context, failure)
    }
}

/// The default sink: logs every uncaught failure at error level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl UncaughtSink for TracingSink {
    fn report(&self, context: &ContextHandle, failure: &TaskFailure) {
        tracing::error!(
            context = %context.id(),
            name = context.name(),
            error = %failure,
            "uncaught failure in context"
        );
    }
}

/// Installs the process-wide sink for uncaught failures.
///
/// Can only succeed once, and only before the first failure has been
/// reported (which initializes the default [`TracingSink`]).
pub fn set_uncaught_sink(sink: impl UncaughtSink) -> Result<(), AlreadyInitialized> {
    SINK.set(Box::new(sink)).map_err(|_| AlreadyInitialized("uncaught failure sink"))
}

/// Hands an uncaught failure to the installed sink.
pub(crate) fn report(context: &ContextHandle, failure: &TaskFailure) {
    SINK.get_or_init(|| Box::new(TracingSink)).report(context, failure);
}
