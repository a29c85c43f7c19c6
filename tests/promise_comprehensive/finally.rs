//! Finally Tests
//!
//! `fin` runs on either outcome and passes the settlement through:
//! - Value and reason pass-through
//! - A failing finally handler overrides the outcome
//! - A promise-returning finally handler delays pass-through

use crate::*;

#[test]
fn test_fin_passes_value_through() {
    test_across_runtimes(|runtime| {
        let log = new_log();

        let finished = log.clone();
        let result = make_promise(runtime)
            .then(|message| Ok(message.chars().next()))
            .fin(move || record(&finished, "fin"));

        assert_eq!(settle(runtime, &result).unwrap().unwrap(), Some('H'));
        assert_eq!(entries(&log), vec!["fin"]);
    });
}

#[test]
fn test_fin_passes_reason_through() {
    test_across_runtimes(|runtime| {
        let log = new_log();

        let finished = log.clone();
        let result = make_fail_promise(runtime).fin(move || record(&finished, "fin"));

        let reason = settle(runtime, &result).unwrap().unwrap_err();
        assert_eq!(reason.message(), "Connection timed out!");
        assert_eq!(entries(&log), vec!["fin"]);
    });
}

#[test]
fn test_fin_error_overrides_value() {
    let runtime = manual_runtime();
    let result = runtime
        .fulfilled(1)
        .fin(|| Err(Error::rejected("cleanup failed")));

    let reason = settle(&runtime, &result).unwrap().unwrap_err();
    assert_eq!(reason.message(), "cleanup failed");
}

#[test]
fn test_fin_error_overrides_reason() {
    let runtime = manual_runtime();
    let result = runtime
        .rejected::<i32>("original")
        .fin(|| Err(Error::rejected("cleanup failed")));

    let reason = settle(&runtime, &result).unwrap().unwrap_err();
    assert_eq!(reason.message(), "cleanup failed");
}

#[test]
fn test_fin_panic_overrides_value() {
    let runtime = manual_runtime();
    let result = runtime.fulfilled(1).fin(|| -> () { panic!("cleanup exploded") });

    let reason = settle(&runtime, &result).unwrap().unwrap_err();
    assert!(reason.is_panic());
}

#[test]
fn test_fin_waits_for_returned_promise() {
    let runtime = manual_runtime();
    let cleanup = runtime.defer::<()>();
    let log = new_log();

    let gate = cleanup.promise();
    let finished = log.clone();
    let result = runtime.fulfilled("kept".to_string()).fin(move || {
        record(&finished, "fin started");
        gate
    });

    runtime.run_until_idle();
    assert_eq!(entries(&log), vec!["fin started"]);
    assert!(result.is_pending(), "pass-through waits for the cleanup promise");

    cleanup.fulfill(());
    runtime.run_until_idle();
    assert_eq!(result.value().as_deref(), Some("kept"));
}

#[test]
fn test_fin_returned_promise_rejection_overrides() {
    test_across_runtimes(|runtime| {
        let scheduler = Arc::clone(runtime.scheduler());
        let result = make_promise(runtime)
            .fin(move || Promise::<()>::rejected(scheduler, "async cleanup failed"));

        let reason = settle(runtime, &result).unwrap().unwrap_err();
        assert_eq!(reason.message(), "async cleanup failed");
    });
}

#[test]
fn test_fin_with_discarded_chain() {
    let runtime = manual_runtime();
    let side = runtime.defer::<u64>();

    let side_done = side.promise().discard();
    let result = runtime.fulfilled(7).fin(move || side_done);

    side.fulfill(99);
    assert_eq!(settle(&runtime, &result).unwrap().unwrap(), 7);
}

#[test]
fn test_fin_scope_mutation() {
    test_across_runtimes(|runtime| {
        let scope = Arc::new(Mutex::new(Vec::<&'static str>::new()));

        let (then_scope, fin_scope) = (Arc::clone(&scope), Arc::clone(&scope));
        let done = make_promise(runtime)
            .then(move |_| then_scope.lock().push("then"))
            .fin(move || fin_scope.lock().push("fin"));

        settle(runtime, &done).unwrap().unwrap();
        assert_eq!(*scope.lock(), vec!["then", "fin"]);
    });
}
