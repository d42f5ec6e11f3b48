use super::{Eventual, Failure, Outcome};

use parking_lot::Mutex;

use std::mem;
use std::sync::Arc;

type Callback<T> = Box<dyn FnOnce(Outcome<T>) + Send>;

/// The completer was dropped before it produced an outcome.
///
/// Delivered to the observer as an unchecked [`Failure`].
#[derive(Debug, thiserror::Error)]
#[error("promise was dropped without being completed")]
pub struct Abandoned;

/// Lifecycle of a promise.
enum State<T> {
    /// Neither side has acted yet.
    Pending,

    /// The observer is registered, waiting for the outcome.
    Observed(Callback<T>),

    /// The outcome is known, nobody is observing yet.
    Completed(Outcome<T>),

    /// The outcome was handed to the observer.
    Delivered,
}

/// State shared between a [`Promise`] and its [`Completer`].
struct Shared<T> {
    state: Mutex<State<T>>,
}

impl<T> Shared<T> {
    fn new(state: State<T>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(state),
        })
    }

    /// Publishes the outcome, invoking the observer if one is registered.
    ///
    /// The callback runs after the lock is released so that it may freely
    /// touch other promises.
    fn deliver(&self, outcome: Outcome<T>) {
        let mut state = self.state.lock();

        match mem::replace(&mut *state, State::Delivered) {
            State::Pending => *state = State::Completed(outcome),
            State::Observed(callback) => {
                drop(state);
                callback(outcome);
            }
            // A `Completer` is consumed on completion, so this is unreachable
            // unless the state was already final.
            previous @ (State::Completed(_) | State::Delivered) => *state = previous,
        }
    }

    /// Registers the observer, invoking it immediately if the outcome is known.
    fn observe(&self, callback: Callback<T>) {
        let mut state = self.state.lock();

        match mem::replace(&mut *state, State::Delivered) {
            State::Pending => *state = State::Observed(callback),
            State::Completed(outcome) => {
                drop(state);
                callback(outcome);
            }
            previous @ (State::Observed(_) | State::Delivered) => *state = previous,
        }
    }
}

/// Creates a new pending promise and the completer that settles it.
///
/// # Examples
///
/// ```rust,ignore
/// let (completer, promise) = promise();
///
/// std::thread::spawn(move || completer.succeed(42));
///
/// hang_around::async_run(move || {
///     let value = hang_around::await_future(promise)?;
///     assert_eq!(value, 42);
///     Ok::<_, hang_around::AwaitError>(())
/// });
/// ```
pub fn promise<T>() -> (Completer<T>, Promise<T>) {
    let shared = Shared::new(State::Pending);

    (
        Completer {
            shared: Some(shared.clone()),
        },
        Promise { shared },
    )
}

/// The read side of a single-fire promise.
///
/// Consumed by [`Eventual::on_complete`], so a promise has exactly one
/// observer.
pub struct Promise<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Promise<T> {
    /// Creates a promise that already holds `value`.
    pub fn succeeded(value: T) -> Self {
        Self {
            shared: Shared::new(State::Completed(Ok(value))),
        }
    }

    /// Creates a promise that already holds `failure`.
    pub fn failed(failure: Failure) -> Self {
        Self {
            shared: Shared::new(State::Completed(Err(failure))),
        }
    }

    /// Returns `true` once the outcome is known.
    pub fn is_complete(&self) -> bool {
        matches!(*self.shared.state.lock(), State::Completed(_))
    }
}

impl<T> Eventual<T> for Promise<T> {
    fn on_complete<F>(self, callback: F)
    where
        F: FnOnce(Outcome<T>) + Send + 'static,
    {
        self.shared.observe(Box::new(callback));
    }
}

/// The write side of a single-fire promise.
///
/// Completion consumes the completer. Dropping it without completing
/// fails the promise with [`Abandoned`].
pub struct Completer<T> {
    shared: Option<Arc<Shared<T>>>,
}

impl<T> Completer<T> {
    /// Completes the promise with a value.
    pub fn succeed(self, value: T) {
        self.complete(Ok(value));
    }

    /// Completes the promise with a failure.
    pub fn fail(self, failure: Failure) {
        self.complete(Err(failure));
    }

    /// Completes the promise with an outcome.
    pub fn complete(mut self, outcome: Outcome<T>) {
        if let Some(shared) = self.shared.take() {
            shared.deliver(outcome);
        }
    }
}

impl<T> Drop for Completer<T> {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.take() {
            shared.deliver(Err(Failure::unchecked(Abandoned)));
        }
    }
}
