use hang_around::future::{Eventual, Outcome, Promise, promise};
use hang_around::time::resolve_after;
use hang_around::{AwaitError, async_run, await_future, block_on};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::{Duration, Instant};

/// An eventual value that counts registrations and never completes.
struct CountingEventual(Arc<AtomicUsize>);

impl Eventual<u32> for CountingEventual {
    fn on_complete<F>(self, _callback: F)
    where
        F: FnOnce(Outcome<u32>) + Send + 'static,
    {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_await_returns_resolved_value() {
    let result = block_on(|| await_future(resolve_after(Duration::from_millis(20), "X")));

    assert!(matches!(result, Ok("X")), "await should return the resolved value");
}

#[test]
fn test_await_on_completed_promise_returns_immediately() {
    let result = block_on(|| await_future(Promise::succeeded(7)));

    assert_eq!(result.unwrap(), 7);
}

#[test]
fn test_statement_after_await_runs_after_value_is_available() {
    let (completer, promise) = promise();
    let completed = Arc::new(AtomicBool::new(false));

    let completer_flag = completed.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(30));
        completer_flag.store(true, Ordering::SeqCst);
        completer.succeed(1);
    });

    let observed = block_on(move || {
        let value = await_future(promise)?;
        Ok::<_, AwaitError>((value, completed.load(Ordering::SeqCst)))
    });

    assert_eq!(observed.unwrap(), (1, true));
}

#[test]
fn test_async_run_returns_before_value_is_available() {
    let available = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel();

    let started = Instant::now();
    let flag = available.clone();

    async_run(move || {
        let value = await_future(resolve_after(Duration::from_millis(200), "X"))?;
        flag.store(true, Ordering::SeqCst);
        let _ = tx.send(value);
        Ok::<_, AwaitError>(())
    });

    assert!(
        !available.load(Ordering::SeqCst),
        "async_run must return before the awaited value exists"
    );
    assert!(started.elapsed() < Duration::from_millis(200));

    let value = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(value, "X");
}

#[test]
fn test_sequential_awaits_preserve_program_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let log_clone = log.clone();

    block_on(move || {
        // Both futures are in flight before the first await; the fast one
        // completes long before the slow one.
        let slow = resolve_after(Duration::from_millis(100), "A");
        let fast = resolve_after(Duration::from_millis(1), "B");

        let a = await_future(slow)?;
        log_clone.lock().unwrap().push(a);

        let b = await_future(fast)?;
        log_clone.lock().unwrap().push(b);

        Ok::<_, AwaitError>(())
    })
    .unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["A", "B"]);
}

#[test]
fn test_many_awaits_in_one_context() {
    let sum = block_on(|| {
        let mut sum = 0;
        for i in 0..50 {
            sum += await_future(resolve_after(Duration::from_millis(1), i))?;
        }
        Ok::<_, AwaitError>(sum)
    });

    assert_eq!(sum.unwrap(), (0..50).sum::<i32>());
}

#[test]
fn test_completion_from_other_thread_before_park() {
    let result = block_on(|| {
        let (completer, promise) = promise();

        // Completes as soon as possible, racing the park.
        thread::spawn(move || completer.succeed("raced"));

        await_future(promise)
    });

    assert_eq!(result.unwrap(), "raced");
}

#[test]
fn test_await_outside_context_fails_without_registering() {
    let registrations = Arc::new(AtomicUsize::new(0));

    let result = await_future(CountingEventual(registrations.clone()));

    assert!(matches!(result, Err(AwaitError::OutsideContext)));
    assert_eq!(registrations.load(Ordering::SeqCst), 0);

    // The same holds on a plain thread spawned from inside a context.
    let nested = block_on({
        let registrations = registrations.clone();
        move || {
            thread::spawn(move || await_future(CountingEventual(registrations)))
                .join()
                .unwrap()
        }
    });

    assert!(matches!(nested, Err(AwaitError::OutsideContext)));
    assert_eq!(registrations.load(Ordering::SeqCst), 0);
}

#[test]
fn test_contexts_run_concurrently() {
    let (tx, rx) = mpsc::channel();
    let started = Instant::now();

    for i in 0..20 {
        let tx = tx.clone();
        async_run(move || {
            let value = await_future(resolve_after(Duration::from_millis(100), i))?;
            let _ = tx.send(value);
            Ok::<_, AwaitError>(())
        });
    }
    drop(tx);

    let mut values: Vec<i32> = rx.iter().collect();
    values.sort();

    assert_eq!(values, (0..20).collect::<Vec<_>>());
    assert!(
        started.elapsed() < Duration::from_secs(2),
        "parked contexts should wait in parallel"
    );
}
