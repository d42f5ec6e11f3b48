use crate::error::AwaitError;
use crate::future::{Eventual, Outcome};
use crate::runtime::context::{self, ContextHandle};

use parking_lot::Mutex;

use std::mem;
use std::sync::Arc;

/// Single-assignment slot of a completion bridge.
enum Slot<T> {
    /// The future has not completed yet.
    Awaiting,

    /// The outcome is stored, waiting to be read by the parked context.
    Completed(Outcome<T>),

    /// The outcome was handed to the awaiting context.
    Consumed,

    /// The awaiting context was interrupted and gave up. Any late outcome
    /// is dropped.
    Abandoned,
}

/// Pairs one parked context with the eventual outcome of one future.
///
/// The bridge is the only object shared across threads during an await:
/// the future's completion callback writes the slot once, then resumes the
/// captured context; the context reads the slot once after resuming.
pub(crate) struct CompletionBridge<T> {
    context: ContextHandle,
    slot: Mutex<Slot<T>>,
}

impl<T> CompletionBridge<T> {
    pub(crate) fn new(context: ContextHandle) -> Arc<Self> {
        Arc::new(Self {
            context,
            slot: Mutex::new(Slot::Awaiting),
        })
    }

    /// Stores the outcome and resumes the bound context.
    ///
    /// Runs on whatever thread completes the future.
    pub(crate) fn complete(&self, outcome: Outcome<T>) {
        let mut slot = self.slot.lock();

        if matches!(*slot, Slot::Awaiting) {
            *slot = Slot::Completed(outcome);
            drop(slot);

            tracing::debug!(context = %self.context.id(), "awaited future completed");
            self.context.unpark();
            return;
        }

        let abandoned = matches!(*slot, Slot::Abandoned);
        drop(slot);

        if abandoned {
            tracing::warn!(
                context = %self.context.id(),
                "future completed after its awaiting context was interrupted; outcome dropped"
            );
        } else {
            tracing::warn!(
                context = %self.context.id(),
                "future completed more than once; extra outcome ignored"
            );
        }
    }

    /// Parks the bound context until the outcome is available, then
    /// consumes it.
    ///
    /// An outcome already in the slot always wins over a pending interrupt.
    /// Wake-ups that find the slot empty and no interrupt pending (a permit
    /// left over from an earlier await) simply park again.
    pub(crate) fn wait(&self) -> Result<T, AwaitError> {
        loop {
            {
                let mut slot = self.slot.lock();

                match mem::replace(&mut *slot, Slot::Consumed) {
                    Slot::Completed(outcome) => return outcome.map_err(AwaitError::from),
                    Slot::Awaiting if self.context.take_interrupt() => {
                        *slot = Slot::Abandoned;
                        return Err(AwaitError::Interrupted(self.context.id()));
                    }
                    previous => *slot = previous,
                }
            }

            self.context.park();
        }
    }
}

/// Suspends the current context until `eventual` completes, then returns
/// its value.
///
/// The calling thread must be an await-capable context, i.e. one created
/// by [`async_run`](crate::async_run), [`spawn`](crate::spawn),
/// [`block_on`](crate::block_on), a [`Builder`](crate::Builder) or an
/// [`async_handler`](crate::async_handler) wrapper. The context is parked,
/// not busy-waiting, while the future is pending, and is resumed by the
/// future's completion callback from whichever thread runs it.
///
/// Sequential awaits in one context complete in program order, whatever
/// the order in which the underlying futures complete.
///
/// # Errors
///
/// - [`AwaitError::OutsideContext`] if called from any other thread. Nothing
///   is registered on `eventual` in that case.
/// - [`AwaitError::Unchecked`] with the original error if the future failed
///   with [`Failure::Unchecked`](crate::future::Failure::Unchecked).
/// - [`AwaitError::Wrapped`] around the original error if it failed with
///   [`Failure::Checked`](crate::future::Failure::Checked).
/// - [`AwaitError::Interrupted`] if the context was
///   [interrupted](ContextHandle::interrupt) before the future completed.
///   The future's eventual outcome is then dropped when it arrives.
///
/// # Examples
///
/// ```rust,ignore
/// use hang_around::{async_run, await_future, AwaitError};
///
/// async_run(move || {
///     let set = await_future(redis.send(set_cmd))?;
///     let get = await_future(redis.send(get_cmd))?;
///     println!("{set} {get}");
///     Ok::<_, AwaitError>(())
/// });
/// ```
pub fn await_future<T, E>(eventual: E) -> Result<T, AwaitError>
where
    T: Send + 'static,
    E: Eventual<T>,
{
    let context = context::current().ok_or(AwaitError::OutsideContext)?;

    let bridge = CompletionBridge::new(context);
    let writer = Arc::clone(&bridge);

    eventual.on_complete(move |outcome| writer.complete(outcome));

    bridge.wait()
}
