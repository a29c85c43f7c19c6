//! Resolution Tests
//!
//! Settle-once semantics and state inspection:
//! - First settlement wins
//! - Pre-settled constructors
//! - Reason conversion

use crate::*;

#[test]
fn test_defer_starts_pending() {
    test_across_runtimes(|runtime| {
        let deferred = runtime.defer::<String>();
        let promise = deferred.promise();

        assert_eq!(promise.state(), State::Pending);
        assert!(promise.is_pending());
        assert!(promise.value().is_none());
        assert!(promise.reason().is_none());
        assert!(!deferred.is_settled());
    });
}

#[test]
fn test_basic_fulfillment() {
    test_across_runtimes(|runtime| {
        let promise = make_promise(runtime);
        let result = settle(runtime, &promise).expect("promise should settle");
        assert_eq!(result.unwrap(), "Hello World");
        assert!(promise.is_fulfilled());
    });
}

#[test]
fn test_basic_rejection() {
    test_across_runtimes(|runtime| {
        let promise = make_fail_promise(runtime);
        let reason = settle(runtime, &promise)
            .expect("promise should settle")
            .unwrap_err();
        assert_eq!(reason.message(), "Connection timed out!");
        assert!(promise.is_rejected());
    });
}

#[test]
fn test_first_settlement_wins() {
    let runtime = manual_runtime();
    let deferred = runtime.defer::<i32>();

    assert!(deferred.fulfill(1));
    assert!(!deferred.fulfill(2));
    assert!(!deferred.reject("late"));
    assert!(!deferred.settle(Ok::<_, Error>(3)));

    assert_eq!(deferred.promise().value(), Some(1));
}

#[test]
fn test_first_rejection_wins() {
    let runtime = manual_runtime();
    let deferred = runtime.defer::<i32>();

    assert!(deferred.reject("first"));
    assert!(!deferred.reject("second"));
    assert!(!deferred.fulfill(1));

    assert_eq!(deferred.promise().reason().unwrap().message(), "first");
}

#[test]
fn test_double_settlement_runs_handlers_once() {
    let runtime = manual_runtime();
    let deferred = runtime.defer::<i32>();
    let calls = Arc::new(Mutex::new(0));

    let counter = Arc::clone(&calls);
    deferred.promise().then(move |_| *counter.lock() += 1);

    deferred.fulfill(1);
    deferred.fulfill(2);
    runtime.run_until_idle();
    deferred.reject("again");
    runtime.run_until_idle();

    assert_eq!(*calls.lock(), 1);
}

#[test]
fn test_prefilled_promise() {
    test_across_runtimes(|runtime| {
        let promise = runtime.fulfilled("Hello World".to_string());
        assert!(promise.is_fulfilled());

        let seen = promise.then(|value| Ok(value.len()));
        assert_eq!(settle(runtime, &seen).unwrap().unwrap(), 11);
    });
}

#[test]
fn test_prerejected_promise() {
    let runtime = manual_runtime();
    let promise = runtime.rejected::<i32>("gone");
    assert_eq!(promise.reason().unwrap().to_string(), "gone");
}

#[test]
fn test_custom_reason_downcasts() {
    let runtime = manual_runtime();
    let deferred = runtime.defer::<i32>();
    let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "socket timed out");

    deferred.reject(Error::custom(io));
    let reason = deferred.promise().reason().unwrap();

    let inner = reason
        .downcast_ref::<std::io::Error>()
        .expect("reason should keep the io::Error");
    assert_eq!(inner.kind(), std::io::ErrorKind::TimedOut);
}

#[test]
fn test_settlement_snapshot() {
    let runtime = manual_runtime();
    let deferred = runtime.defer::<Vec<u8>>();
    deferred.fulfill(vec![1, 2, 3]);

    let settlement = deferred.promise().settlement().unwrap();
    assert_eq!(settlement.state(), State::Fulfilled);
    assert_eq!(settlement.value(), Some(&vec![1, 2, 3]));
    assert!(settlement.reason().is_none());
}
