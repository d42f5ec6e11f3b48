use hang_around::future::{Abandoned, Failure, Promise, promise};
use hang_around::time::fail_after;
use hang_around::{AwaitError, BoxError, await_future, block_on};
use std::error::Error;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
#[error("custom failure: {0}")]
struct Custom(String);

#[derive(Debug, thiserror::Error)]
#[error("checked failure: {0}")]
struct Checked(String);

fn address(error: &(dyn Error + Send + Sync + 'static)) -> *const () {
    error as *const (dyn Error + Send + Sync + 'static) as *const ()
}

#[test]
fn test_unchecked_failure_is_returned_unchanged() {
    let cause: BoxError = Box::new(Custom("E".into()));
    let original = address(cause.as_ref()) as usize;

    let result =
        block_on(move || await_future(Promise::<()>::failed(Failure::Unchecked(cause))));

    let Err(AwaitError::Unchecked(err)) = result else {
        panic!("expected the unchecked failure to pass through");
    };

    assert_eq!(
        address(err.as_ref()) as usize,
        original,
        "identity must be preserved"
    );
    assert_eq!(err.to_string(), "custom failure: E");
    assert!(err.downcast_ref::<Custom>().is_some(), "type must be preserved");
}

#[test]
fn test_unchecked_failure_displays_as_cause() {
    let result = block_on(|| {
        await_future(Promise::<()>::failed(Failure::unchecked(Custom(
            "E".into(),
        ))))
    });

    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "custom failure: E");
    assert!(err.cause().unwrap().downcast_ref::<Custom>().is_some());
}

#[test]
fn test_checked_failure_is_wrapped() {
    let result = block_on(|| {
        await_future(Promise::<()>::failed(Failure::checked(Checked(
            "E2".into(),
        ))))
    });

    let err = result.unwrap_err();
    assert!(matches!(err, AwaitError::Wrapped(_)));

    let source = err.source().expect("wrapper must expose its cause");
    let inner = source
        .downcast_ref::<Checked>()
        .expect("inner cause must be the original");
    assert_eq!(inner.0, "E2");
    assert!(err.to_string().contains("E2"));
}

#[test]
fn test_failure_delivered_from_timer_thread() {
    let result = block_on(|| {
        await_future(fail_after::<u8>(
            Duration::from_millis(20),
            Failure::unchecked(Custom("late".into())),
        ))
    });

    let cause = result.unwrap_err().into_cause().unwrap();
    assert_eq!(cause.downcast_ref::<Custom>().unwrap().0, "late");
}

#[test]
fn test_dropped_completer_fails_await() {
    let result = block_on(|| {
        let (completer, promise) = promise::<u8>();
        std::thread::spawn(move || drop(completer));
        await_future(promise)
    });

    let err = result.unwrap_err();
    assert!(matches!(err, AwaitError::Unchecked(_)));
    assert!(err.cause().unwrap().downcast_ref::<Abandoned>().is_some());
}

#[test]
fn test_failure_propagates_with_question_mark() {
    let result = block_on(|| -> Result<u8, AwaitError> {
        let first = await_future(Promise::succeeded(1u8))?;
        let second: u8 = await_future(Promise::failed(Failure::checked("second failed")))?;
        Ok(first + second)
    });

    let err = result.unwrap_err();
    assert_eq!(err.source().unwrap().to_string(), "second failed");
}

#[test]
fn test_context_survives_failed_await() {
    let result = block_on(|| {
        let failed = await_future(Promise::<u8>::failed(Failure::unchecked("first")));
        let recovered = await_future(Promise::succeeded(2u8));
        (failed.is_err(), recovered.ok())
    });

    assert_eq!(result, (true, Some(2)));
}
