//! Chaining Tests
//!
//! Tests for `then` and `then_or`:
//! - Value transformation across links
//! - Rejection skipping success handlers
//! - Type-changing chains

use crate::*;

#[test]
fn test_hello_world_chain() {
    test_across_runtimes(|runtime| {
        let log = new_log();

        let first = log.clone();
        let second = log.clone();
        let done = make_promise(runtime)
            .then(move |message| {
                record(&first, message.clone());
                Ok(message + "!!!")
            })
            .then(move |message| record(&second, message));

        settle(runtime, &done).unwrap().unwrap();
        assert_eq!(entries(&log), vec!["Hello World", "Hello World!!!"]);
    });
}

#[test]
fn test_type_changing_chain() {
    test_across_runtimes(|runtime| {
        let result = make_promise(runtime)
            .then(|message| Ok(message.to_uppercase()))
            .then(|message| Ok(message.chars().next()))
            .then(|first: Option<char>| Ok(first.map(u32::from)));

        assert_eq!(settle(runtime, &result).unwrap().unwrap(), Some('H' as u32));
    });
}

#[test]
fn test_then_skipped_on_rejection() {
    test_across_runtimes(|runtime| {
        let log = new_log();

        let unreachable = log.clone();
        let result = make_fail_promise(runtime)
            .then(move |_| {
                record(&unreachable, "then ran");
                Ok(1)
            })
            .then(|n| Ok(n + 1));

        let reason = settle(runtime, &result).unwrap().unwrap_err();
        assert_eq!(reason.message(), "Connection timed out!");
        assert!(entries(&log).is_empty(), "then must not run on rejection");
    });
}

#[test]
fn test_fail_skipped_on_fulfillment() {
    test_across_runtimes(|runtime| {
        let log = new_log();

        let unreachable = log.clone();
        let result = make_promise(runtime).fail(move |_| {
            record(&unreachable, "fail ran");
            Ok("recovered".to_string())
        });

        assert_eq!(settle(runtime, &result).unwrap().unwrap(), "Hello World");
        assert!(entries(&log).is_empty());
    });
}

#[test]
fn test_then_or_runs_success_arm() {
    let runtime = manual_runtime();
    let result = runtime
        .fulfilled(2)
        .then_or(|v| Ok(v * 10), |_| Ok(-1));
    assert_eq!(settle(&runtime, &result).unwrap().unwrap(), 20);
}

#[test]
fn test_then_or_runs_failure_arm() {
    let runtime = manual_runtime();
    let result = runtime
        .rejected::<i32>("nope")
        .then_or(|v| Ok(v * 10), |reason| Ok(reason.message().len() as i32));
    assert_eq!(settle(&runtime, &result).unwrap().unwrap(), 4);
}

#[test]
fn test_then_or_failure_arm_can_rethrow() {
    let runtime = manual_runtime();
    let result: Promise<i32> = runtime
        .rejected::<i32>("nope")
        .then_or(|v| Ok(v), |reason| Err(Error::rejected(format!("wrapped: {}", reason))));

    let reason = settle(&runtime, &result).unwrap().unwrap_err();
    assert_eq!(reason.message(), "wrapped: nope");
}

#[test]
fn test_branching_from_one_promise() {
    test_across_runtimes(|runtime| {
        let promise = make_promise(runtime);

        let upper = promise.then(|m| Ok(m.to_uppercase()));
        let lower = promise.then(|m| Ok(m.to_lowercase()));
        let len = promise.then(|m| Ok(m.len()));

        assert_eq!(settle(runtime, &upper).unwrap().unwrap(), "HELLO WORLD");
        assert_eq!(settle(runtime, &lower).unwrap().unwrap(), "hello world");
        assert_eq!(settle(runtime, &len).unwrap().unwrap(), 11);
    });
}

#[test]
fn test_discard_keeps_completion() {
    let runtime = manual_runtime();
    let done = make_promise(&runtime).discard();
    assert!(settle(&runtime, &done).unwrap().is_ok());

    let failed = make_fail_promise(&runtime).discard();
    assert!(settle(&runtime, &failed).unwrap().is_err());
}

#[test]
fn test_chained_promises_share_scheduler() {
    let runtime = manual_runtime();
    let chained = runtime.defer::<i32>().promise().then(|v| Ok(v + 1));
    assert!(Arc::ptr_eq(chained.scheduler(), runtime.scheduler()));
}
