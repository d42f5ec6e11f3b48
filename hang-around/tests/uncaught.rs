use hang_around::diagnostics::{TracingSink, set_uncaught_sink};
use hang_around::future::{Failure, Promise};
use hang_around::{
    AwaitError, ContextHandle, ContextId, Handler, TaskFailure, async_handler, async_run,
    await_future, spawn,
};
use std::sync::{Mutex, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

/// Every failure reported to the sink, as (context, rendered failure).
static REPORTED: Mutex<Vec<(ContextId, String)>> = Mutex::new(Vec::new());

fn install_sink() {
    static INSTALLED: OnceLock<()> = OnceLock::new();

    INSTALLED.get_or_init(|| {
        set_uncaught_sink(|context: &ContextHandle, failure: &TaskFailure| {
            REPORTED
                .lock()
                .unwrap()
                .push((context.id(), failure.to_string()));
        })
        .expect("sink installed twice");
    });
}

fn reports_for(id: ContextId) -> Vec<String> {
    REPORTED
        .lock()
        .unwrap()
        .iter()
        .filter(|(context, _)| *context == id)
        .map(|(_, failure)| failure.clone())
        .collect()
}

/// Waits until a failure whose message contains `matching` is reported.
fn wait_for_new_report(matching: &str) -> (ContextId, String) {
    let deadline = Instant::now() + Duration::from_secs(5);

    loop {
        if let Some(found) = REPORTED
            .lock()
            .unwrap()
            .iter()
            .find(|(_, failure)| failure.contains(matching))
        {
            return found.clone();
        }

        assert!(Instant::now() < deadline, "no failure matching {matching:?} reported");
        thread::sleep(Duration::from_millis(2));
    }
}

#[test]
fn test_panic_is_reported_with_context_identity() {
    install_sink();

    let handle = spawn(|| -> Result<(), AwaitError> { panic!("exploded in task") }).unwrap();
    let id = handle.id();

    let failure = handle.join().unwrap_err();
    assert!(matches!(failure, TaskFailure::Panicked(ref msg) if msg == "exploded in task"));

    assert_eq!(reports_for(id), vec!["task panicked: exploded in task".to_string()]);
}

#[test]
fn test_returned_error_is_reported() {
    install_sink();

    let handle = spawn(|| {
        await_future(Promise::<()>::failed(Failure::unchecked("backend down")))?;
        Ok::<_, AwaitError>(())
    })
    .unwrap();
    let id = handle.id();

    assert!(matches!(handle.join(), Err(TaskFailure::Failed(_))));
    assert_eq!(reports_for(id), vec!["task failed: backend down".to_string()]);
}

#[test]
fn test_successful_task_reports_nothing() {
    install_sink();

    let handle = spawn(|| await_future(Promise::succeeded(()))).unwrap();
    let id = handle.id();

    assert!(handle.join().is_ok());
    assert!(reports_for(id).is_empty());
}

#[test]
fn test_async_run_swallows_failure_after_reporting() {
    install_sink();

    async_run(|| -> Result<(), AwaitError> {
        await_future(Promise::<()>::failed(Failure::checked("fire-and-forget")))?;
        Ok(())
    });

    let (_, failure) = wait_for_new_report("fire-and-forget");
    assert!(failure.starts_with("task failed: awaited future failed"));
}

#[test]
fn test_spawned_handler_panic_is_reported() {
    install_sink();

    let handler = async_handler(|code: u16| {
        if code >= 500 {
            panic!("handler failed with {code}");
        }
    });
    handler.handle(503);

    let (_, failure) = wait_for_new_report("handler failed with 503");
    assert_eq!(failure, "task panicked: handler failed with 503");
}

#[test]
fn test_sink_can_only_be_installed_once() {
    install_sink();

    assert!(set_uncaught_sink(TracingSink).is_err());
}
