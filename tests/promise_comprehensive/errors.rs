//! Error Propagation Tests
//!
//! Handler failures become rejections:
//! - `Err` from a success or failure handler
//! - Panics inside handlers
//! - Recovery with `fail`

use crate::*;

#[test]
fn test_failure_scenario() {
    test_across_runtimes(|runtime| {
        let log = new_log();

        let (unreachable, failed, finished) = (log.clone(), log.clone(), log.clone());
        let done = make_fail_promise(runtime)
            .then(move |_| record(&unreachable, "then"))
            .fail(move |reason| record(&failed, format!("fail: {}", reason)))
            .fin(move || record(&finished, "fin"));

        settle(runtime, &done).unwrap().unwrap();
        assert_eq!(entries(&log), vec!["fail: Connection timed out!", "fin"]);
    });
}

#[test]
fn test_error_scenario() {
    test_across_runtimes(|runtime| {
        let log = new_log();

        let (unreachable, failed, finished) = (log.clone(), log.clone(), log.clone());
        let done = make_promise(runtime)
            .then(|_message| -> Result<String> {
                Err(Error::rejected("Ahh Error Occurred! Just testing..."))
            })
            .then(move |_| record(&unreachable, "second then"))
            .fail(move |reason| record(&failed, reason.message()))
            .fin(move || record(&finished, "fin"));

        settle(runtime, &done).unwrap().unwrap();
        assert_eq!(
            entries(&log),
            vec!["Ahh Error Occurred! Just testing...", "fin"]
        );
    });
}

#[test]
fn test_panic_scenario() {
    test_across_runtimes(|runtime| {
        let log = new_log();

        let (unreachable, failed) = (log.clone(), log.clone());
        let done = make_promise(runtime)
            .then(|message: String| -> Result<char> {
                // Out-of-range index panics like a thrown exception
                let bytes = message.as_bytes();
                Ok(bytes[bytes.len() + 5] as char)
            })
            .then(move |_| record(&unreachable, "then"))
            .fail(move |reason| {
                assert!(reason.is_panic());
                record(&failed, "caught panic");
            });

        settle(runtime, &done).unwrap().unwrap();
        assert_eq!(entries(&log), vec!["caught panic"]);
    });
}

#[test]
fn test_panic_in_failure_handler() {
    let runtime = manual_runtime();
    let result: Promise<i32> = runtime.rejected::<i32>("first").fail(|_| -> Result<i32> {
        panic!("handler exploded");
    });

    let reason = settle(&runtime, &result).unwrap().unwrap_err();
    assert!(reason.is_panic());
    assert_eq!(reason.message(), "handler exploded");
    assert_eq!(reason.to_string(), "handler panicked: handler exploded");
}

#[test]
fn test_error_from_failure_handler_replaces_reason() {
    let runtime = manual_runtime();
    let result = runtime
        .rejected::<i32>("original")
        .fail(|reason| Err(Error::rejected(format!("{} (retried)", reason))));

    let reason = settle(&runtime, &result).unwrap().unwrap_err();
    assert_eq!(reason.message(), "original (retried)");
}

#[test]
fn test_fail_recovers_and_chain_continues() {
    test_across_runtimes(|runtime| {
        let result = make_fail_promise(runtime)
            .fail(|_| Ok("fallback".to_string()))
            .then(|value| Ok(value + "!"));

        assert_eq!(settle(runtime, &result).unwrap().unwrap(), "fallback!");
    });
}

#[test]
fn test_rejection_passes_through_long_chain() {
    let runtime = manual_runtime();
    let mut promise = runtime.rejected::<u64>("deep");
    for _ in 0..50 {
        promise = promise.then(|n| Ok(n + 1));
    }

    let reason = settle(&runtime, &promise).unwrap().unwrap_err();
    assert_eq!(reason.message(), "deep");
}

#[test]
fn test_unhandled_rejection_is_inert() {
    test_across_runtimes(|runtime| {
        // No failure handler anywhere: nothing panics, the reason is kept
        let tail = make_fail_promise(runtime).then(|m| Ok(m.len()));
        let reason = settle(runtime, &tail).unwrap().unwrap_err();
        assert_eq!(reason.message(), "Connection timed out!");
    });
}

#[test]
fn test_raw_task_panic_does_not_kill_event_loop() {
    let runtime = event_loop_runtime();
    runtime.scheduler().schedule(Box::new(|| panic!("raw task")));

    let after = runtime.fulfilled(1).then(|v| Ok(v + 1));
    assert_eq!(settle(&runtime, &after).unwrap().unwrap(), 2);
    runtime.shutdown().unwrap();
}
