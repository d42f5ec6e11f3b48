use crate::runtime::config::Config;
use crate::runtime::parker::Parker;
use crate::runtime::task::state::{ContextState, PARKED, RUNNING, TERMINATED};

use std::cell::OnceCell;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

thread_local! {
    /// Handle of the execution context running on this thread.
    ///
    /// Installed exactly once, before the context's task starts, and never
    /// replaced. Threads that were not created by the runtime leave it
    /// empty, which is what makes them not await-capable.
    static CURRENT_CONTEXT: OnceCell<ContextHandle> = const { OnceCell::new() };
}

/// Source of context identifiers. Starts at 1 so that 0 never appears.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identity of an execution context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u64);

impl ContextId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric identifier.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Data shared by every handle to one context.
struct ContextInner {
    id: ContextId,
    name: String,

    /// One of `RUNNING`, `PARKED` or `TERMINATED`.
    state: AtomicUsize,

    parker: Parker,
}

/// A cloneable reference to an await-capable execution context.
///
/// Handles are how the runtime targets a resume at exactly one context:
/// a completion bridge captures the handle of the context that created
/// it and unparks that context, never any other.
#[derive(Clone)]
pub struct ContextHandle {
    inner: Arc<ContextInner>,
}

impl ContextHandle {
    /// Creates the handle of a new context. Without an explicit name the
    /// context is named after the configured prefix and its id.
    pub(crate) fn new(name: Option<String>) -> Self {
        let id = ContextId::next();
        let name = name.unwrap_or_else(|| Config::global().context_name(id.as_u64()));

        Self {
            inner: Arc::new(ContextInner {
                id,
                name,
                state: AtomicUsize::new(RUNNING),
                parker: Parker::new(),
            }),
        }
    }

    /// Returns the identity of the context.
    pub fn id(&self) -> ContextId {
        self.inner.id
    }

    /// Returns the name given to the context at spawn time.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns the current lifecycle state of the context.
    pub fn state(&self) -> ContextState {
        ContextState::from_raw(self.inner.state.load(Ordering::Acquire))
    }

    /// Interrupts the context.
    ///
    /// If the context is parked in [`await_future`](crate::await_future),
    /// it wakes up and the await fails with
    /// [`AwaitError::Interrupted`](crate::AwaitError::Interrupted).
    /// Otherwise the request stays pending and the next await that would
    /// have to park fails instead.
    ///
    /// The outcome of the future being awaited is lost when this happens.
    pub fn interrupt(&self) {
        tracing::trace!(context = %self.id(), "interrupt requested");
        self.inner.parker.interrupt();
    }

    /// Returns `true` if an interrupt is pending.
    pub fn is_interrupted(&self) -> bool {
        self.inner.parker.is_interrupted()
    }

    /// Parks the calling context until it is unparked or interrupted.
    ///
    /// Must only be called by the context itself.
    pub(crate) fn park(&self) {
        self.inner.state.store(PARKED, Ordering::Release);
        tracing::trace!(context = %self.id(), "parked");

        self.inner.parker.park();

        self.inner.state.store(RUNNING, Ordering::Release);
        tracing::trace!(context = %self.id(), "resumed");
    }

    /// Resumes this context. Safe to call from any thread, before or after
    /// the context has actually parked.
    pub(crate) fn unpark(&self) {
        self.inner.parker.unpark();
    }

    pub(crate) fn take_interrupt(&self) -> bool {
        self.inner.parker.take_interrupt()
    }

    pub(crate) fn terminate(&self) {
        self.inner.state.store(TERMINATED, Ordering::Release);
    }

    /// Returns `true` if both handles refer to the same context.
    pub fn same_context(&self, other: &ContextHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ContextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextHandle")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("state", &self.state())
            .finish()
    }
}

/// Tags the current thread as the given execution context.
///
/// Called once, from the freshly spawned thread, before the task runs.
/// Returns `false` if the thread was already tagged, in which case the
/// existing tag is kept.
pub(crate) fn install(context: ContextHandle) -> bool {
    CURRENT_CONTEXT.with(|cell| cell.set(context).is_ok())
}

/// Returns the handle of the execution context running on this thread.
///
/// Returns `None` on threads that were not spawned by this crate, which
/// are exactly the threads where [`await_future`](crate::await_future)
/// is not allowed.
pub fn current() -> Option<ContextHandle> {
    CURRENT_CONTEXT
        .try_with(|cell| cell.get().cloned())
        .ok()
        .flatten()
}

/// Returns `true` if the calling thread is an await-capable context.
pub fn is_await_capable() -> bool {
    CURRENT_CONTEXT
        .try_with(|cell| cell.get().is_some())
        .unwrap_or(false)
}

/// Returns the identity of the current context, if any.
pub fn current_id() -> Option<ContextId> {
    CURRENT_CONTEXT
        .try_with(|cell| cell.get().map(ContextHandle::id))
        .ok()
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::thread;

    #[test]
    fn plain_threads_are_not_tagged() {
        assert!(!is_await_capable());
        assert!(current().is_none());

        let tagged = thread::spawn(is_await_capable).join().unwrap();
        assert!(!tagged);
    }

    #[test]
    fn tag_is_installed_once() {
        let outcome = thread::spawn(|| {
            let first = ContextHandle::new(Some("first".into()));
            let second = ContextHandle::new(Some("second".into()));

            let installed_first = install(first.clone());
            let installed_second = install(second);

            (
                installed_first,
                installed_second,
                current().map(|c| c.same_context(&first)),
            )
        })
        .join()
        .unwrap();

        assert_eq!(outcome, (true, false, Some(true)));
    }

    #[test]
    fn identifiers_are_unique() {
        let a = ContextHandle::new(Some("a".into()));
        let b = ContextHandle::new(Some("b".into()));

        assert_ne!(a.id(), b.id());
        assert!(a.same_context(&a.clone()));
        assert!(!a.same_context(&b));
    }

    #[test]
    fn new_context_starts_running() {
        let context = ContextHandle::new(Some("fresh".into()));

        assert_eq!(context.state(), ContextState::Running);
        context.terminate();
        assert_eq!(context.state(), ContextState::Terminated);
    }
}
