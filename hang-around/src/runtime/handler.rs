use crate::runtime::context;
use crate::runtime::task::async_run;

use std::sync::Arc;

/// A callback taking one value.
///
/// Implemented for every `Fn(V)` closure, and for the wrapper returned by
/// [`async_handler`], so both can be passed wherever a handler is expected.
pub trait Handler<V>: Send + Sync + 'static {
    fn handle(&self, value: V);
}

impl<V, F> Handler<V> for F
where
    F: Fn(V) + Send + Sync + 'static,
{
    fn handle(&self, value: V) {
        self(value)
    }
}

/// A handler that always runs inside an await-capable context.
///
/// Created by [`async_handler`]. Cloning is cheap: clones share the
/// wrapped handler.
pub struct Reentrant<H> {
    handler: Arc<H>,
}

impl<H> Clone for Reentrant<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<V, H> Handler<V> for Reentrant<H>
where
    V: Send + 'static,
    H: Handler<V>,
{
    /// Invokes the wrapped handler inline when already inside an
    /// await-capable context, and on a new one otherwise.
    fn handle(&self, value: V) {
        if context::is_await_capable() {
            self.handler.handle(value);
            return;
        }

        let handler = Arc::clone(&self.handler);
        async_run(move || handler.handle(value));
    }
}

impl<H> Reentrant<H> {
    /// Converts the wrapper into a plain closure, for callback sources that
    /// take `impl Fn(V)` rather than a [`Handler`].
    pub fn into_fn<V>(self) -> impl Fn(V) + Clone + Send + Sync + 'static
    where
        V: Send + 'static,
        H: Handler<V>,
    {
        move |value| self.handle(value)
    }
}

/// Wraps a callback so that it may call [`await_future`](crate::await_future).
///
/// Invoked from inside an await-capable context, the wrapped handler runs
/// synchronously on that context and no new context is spawned; callback
/// entry points nested in tasks therefore do not pile up contexts.
/// Invoked from anywhere else, it spawns a new context, with the same
/// tagging and uncaught failure handling as [`async_run`], and runs there.
///
/// Callers must not assume the handler has completed when the call returns.
///
/// # Examples
///
/// ```rust,ignore
/// let on_request = async_handler(move |request: Request| {
///     match await_future(store.increment("counter")) {
///         Ok(count) => request.respond(200, count.to_string()),
///         Err(err) => request.respond(500, err.to_string()),
///     }
/// });
///
/// server.on_request(on_request.into_fn());
/// ```
pub fn async_handler<H>(handler: H) -> Reentrant<H> {
    Reentrant {
        handler: Arc::new(handler),
    }
}
