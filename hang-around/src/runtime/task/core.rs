use super::JoinHandle;
use crate::diagnostics;
use crate::error::{BoxError, SpawnError, TaskFailure};
use crate::runtime::config::Config;
use crate::runtime::context::{self, ContextHandle};

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

/// What a task returns at the end of its context.
///
/// Implemented for `()` (the task cannot fail) and for `Result<(), E>`,
/// which lets task bodies propagate errors, including
/// [`AwaitError`](crate::AwaitError), with `?`.
pub trait Report {
    /// Converts the task's return value into a success or an uncaught error.
    fn into_result(self) -> Result<(), BoxError>;
}

impl Report for () {
    fn into_result(self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<E> Report for Result<(), E>
where
    E: Into<BoxError>,
{
    fn into_result(self) -> Result<(), BoxError> {
        self.map_err(Into::into)
    }
}

/// Creates a new await-capable context and starts `body` on it.
///
/// The context is tagged before `body` runs and marked terminated once
/// `body` returns or unwinds.
pub(crate) fn launch<F, R>(
    name: Option<String>,
    stack_size: Option<usize>,
    body: F,
) -> Result<(ContextHandle, thread::JoinHandle<R>), SpawnError>
where
    F: FnOnce(&ContextHandle) -> R + Send + 'static,
    R: Send + 'static,
{
    let context = ContextHandle::new(name);
    let stack_size = stack_size.unwrap_or_else(|| Config::global().stack_size);

    // Thread names are C strings.
    if context.name().contains('\0') {
        context.terminate();

        return Err(SpawnError {
            name: context.name().to_string(),
            source: io::Error::new(
                io::ErrorKind::InvalidInput,
                "context name contains a NUL byte",
            ),
        });
    }

    let inner = context.clone();

    let thread = thread::Builder::new()
        .name(context.name().to_string())
        .stack_size(stack_size)
        .spawn(move || {
            let _terminate = Terminate(&inner);

            context::install(inner.clone());
            tracing::trace!(context = %inner.id(), name = inner.name(), "context started");

            body(&inner)
        })
        .map_err(|source| SpawnError {
            name: context.name().to_string(),
            source,
        })?;

    Ok((context, thread))
}

/// Marks the context terminated when dropped, including during unwinding.
struct Terminate<'a>(&'a ContextHandle);

impl Drop for Terminate<'_> {
    fn drop(&mut self) {
        self.0.terminate();
        tracing::trace!(context = %self.0.id(), "context terminated");
    }
}

/// Runs `task` at a context boundary.
///
/// Returned errors and panics are both uncaught failures: they are handed
/// to the process-wide sink and then returned so a joiner can see them.
pub(crate) fn supervise<F, R>(context: &ContextHandle, task: F) -> Result<(), TaskFailure>
where
    F: FnOnce() -> R,
    R: Report,
{
    let failure = match panic::catch_unwind(AssertUnwindSafe(task)) {
        Ok(report) => match report.into_result() {
            Ok(()) => return Ok(()),
            Err(err) => TaskFailure::Failed(err),
        },
        Err(payload) => TaskFailure::from_panic(payload),
    };

    diagnostics::report(context, &failure);
    Err(failure)
}

/// Launches `task` on a new await-capable context and returns immediately.
///
/// This is the entry point for top-level tasks. The caller is never
/// blocked and receives nothing back: a failure escaping the task, whether
/// an `Err` return or a panic, is reported to the
/// [uncaught failure sink](crate::diagnostics) together with the context
/// identity, then swallowed.
///
/// If the OS refuses to create the context, the error is logged and the
/// task is dropped without running.
///
/// # Examples
///
/// ```rust,ignore
/// use hang_around::{async_run, await_future, time::delay};
/// use std::time::Duration;
///
/// async_run(|| {
///     await_future(delay(Duration::from_millis(50)))?;
///     println!("fifty milliseconds later");
///     Ok::<_, hang_around::AwaitError>(())
/// });
/// ```
pub fn async_run<F, R>(task: F)
where
    F: FnOnce() -> R + Send + 'static,
    R: Report + 'static,
{
    if let Err(err) = spawn(task) {
        tracing::error!(
            name = err.name(),
            error = %err.source,
            "failed to spawn context"
        );
    }
}

/// Launches `task` on a new await-capable context, returning a handle to it.
///
/// Behaves like [`async_run`], uncaught failures included, but gives the
/// caller the [`JoinHandle`] of the new context.
pub fn spawn<F, R>(task: F) -> Result<JoinHandle, SpawnError>
where
    F: FnOnce() -> R + Send + 'static,
    R: Report + 'static,
{
    spawn_with(None, None, task)
}

pub(crate) fn spawn_with<F, R>(
    name: Option<String>,
    stack_size: Option<usize>,
    task: F,
) -> Result<JoinHandle, SpawnError>
where
    F: FnOnce() -> R + Send + 'static,
    R: Report + 'static,
{
    let (context, thread) = launch(name, stack_size, move |context| supervise(context, task))?;

    Ok(JoinHandle { context, thread })
}

/// Runs `task` on a new await-capable context and blocks the calling
/// thread until it returns, yielding its value.
///
/// This is the synchronous entry point (e.g. in `main` or tests) and the
/// expansion target of `#[hang_around::main]` and `#[hang_around::test]`.
/// Unlike [`async_run`], nothing is swallowed: a panic in `task` is
/// resumed on the caller.
///
/// # Panics
///
/// Panics if the context cannot be spawned, or if `task` panics.
///
/// # Examples
///
/// ```rust,ignore
/// let value = hang_around::block_on(|| {
///     hang_around::await_future(hang_around::future::Promise::succeeded(42))
/// });
/// assert_eq!(value.unwrap(), 42);
/// ```
pub fn block_on<F, R>(task: F) -> R
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    block_on_with(None, None, task)
}

pub(crate) fn block_on_with<F, R>(name: Option<String>, stack_size: Option<usize>, task: F) -> R
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let (_, thread) = launch(name, stack_size, move |_| task())
        .unwrap_or_else(|err| panic!("block_on failed: {err}"));

    match thread.join() {
        Ok(value) => value,
        Err(payload) => panic::resume_unwind(payload),
    }
}
