//! Timer-backed eventual values.
//!
//! A small stand-in for the timers of an event loop: each function returns
//! a [`Promise`] that a dedicated timer thread completes once the given
//! duration has elapsed. Completion happens off any await-capable context,
//! which is exactly the situation [`await_future`](crate::await_future)
//! bridges.
//!
//! - [`delay`] completes with `()`,
//! - [`resolve_after`] completes with a value,
//! - [`fail_after`] completes with a failure.

mod timer;

use crate::future::{Failure, Promise, promise};

use std::time::{Duration, Instant};

/// Farthest deadline used when `now + duration` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

fn deadline(duration: Duration) -> Instant {
    let now = Instant::now();

    now.checked_add(duration)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

/// Returns a promise that completes with `()` after `duration`.
///
/// # Examples
///
/// ```rust,ignore
/// use hang_around::{await_future, time::delay};
/// use std::time::Duration;
///
/// await_future(delay(Duration::from_millis(500)))?;
/// ```
pub fn delay(duration: Duration) -> Promise<()> {
    resolve_after(duration, ())
}

/// Returns a promise that completes with `value` after `duration`.
pub fn resolve_after<T>(duration: Duration, value: T) -> Promise<T>
where
    T: Send + 'static,
{
    let (completer, promise) = promise();

    timer::schedule(
        deadline(duration),
        Box::new(move || completer.succeed(value)),
    );

    promise
}

/// Returns a promise that fails with `failure` after `duration`.
pub fn fail_after<T>(duration: Duration, failure: Failure) -> Promise<T>
where
    T: Send + 'static,
{
    let (completer, promise) = promise();

    timer::schedule(
        deadline(duration),
        Box::new(move || completer.fail(failure)),
    );

    promise
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflowing_duration_never_fires() {
        let forever = resolve_after(Duration::MAX, 1u8);
        let failing = fail_after::<u8>(Duration::MAX, Failure::unchecked("never"));

        assert!(deadline(Duration::MAX) > Instant::now());
        assert!(!forever.is_complete());
        assert!(!failing.is_complete());
    }

    #[test]
    fn short_delay_completes() {
        let promise = delay(Duration::from_millis(1));
        let started = Instant::now();

        while !promise.is_complete() {
            assert!(started.elapsed() < Duration::from_secs(5), "delay never fired");
            std::thread::sleep(Duration::from_millis(1));
        }
    }
}
