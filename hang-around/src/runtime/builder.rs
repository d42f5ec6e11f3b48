use super::task::core::{Report, block_on_with, spawn_with};
use super::task::JoinHandle;
use crate::error::SpawnError;

/// Builder for configuring and spawning a single execution context.
///
/// `Builder` overrides the process-wide [`Config`](crate::Config) for one
/// context: its name and its stack size. Every context it creates is
/// await-capable, exactly like those created by [`async_run`](crate::async_run).
///
/// # Examples
///
/// ```rust,ignore
/// let handle = Builder::new()
///     .name("request-handler")
///     .stack_size(64 * 1024)
///     .spawn(|| serve())?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct Builder {
    /// Name of the context. Derived from the configured prefix when unset.
    name: Option<String>,

    /// Stack size in bytes. Taken from the configuration when unset.
    stack_size: Option<usize>,
}

impl Builder {
    /// Creates a new `Builder` using the process-wide defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name of the context.
    ///
    /// Names are informational only; whether a context may await never
    /// depends on its name.
    ///
    /// A name containing a NUL byte makes [`spawn`](Self::spawn) fail with
    /// [`SpawnError`] and [`block_on`](Self::block_on) panic.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the stack size of the context, in bytes.
    ///
    /// # Panics
    ///
    /// Panics if `bytes == 0`.
    pub fn stack_size(mut self, bytes: usize) -> Self {
        assert!(bytes > 0, "stack_size must be > 0");

        self.stack_size = Some(bytes);
        self
    }

    /// Spawns `task` on a new context configured by this builder.
    ///
    /// See [`spawn`](crate::spawn).
    pub fn spawn<F, R>(self, task: F) -> Result<JoinHandle, SpawnError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Report + 'static,
    {
        spawn_with(self.name, self.stack_size, task)
    }

    /// Runs `task` on a new context configured by this builder, blocking
    /// until it returns.
    ///
    /// See [`block_on`](crate::block_on).
    ///
    /// # Panics
    ///
    /// Panics if the context cannot be spawned, or if `task` panics.
    pub fn block_on<F, R>(self, task: F) -> R
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        block_on_with(self.name, self.stack_size, task)
    }
}
