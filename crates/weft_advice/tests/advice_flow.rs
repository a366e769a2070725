//! End-to-end dispatch tests: full advice chains around real calls.

use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use weft_advice::prelude::*;

fn lookup() -> OperationInfo {
    OperationInfo::new("employees", "find_by_id")
}

type Log = Arc<Mutex<Vec<String>>>;

fn push(log: &Log, entry: impl Into<String>) {
    log.lock().unwrap().push(entry.into());
}

/// Wires one advice of every kind onto the same selector, all writing to the
/// shared log.
fn full_chain(log: &Log) -> Dispatcher {
    let registry = Arc::new(AdviceRegistry::new());
    let selector = Selector::target("employees");

    let l = Arc::clone(log);
    registry
        .before("trace", selector.clone(), move |_| {
            push(&l, "before");
            Ok(())
        })
        .unwrap();
    let l = Arc::clone(log);
    registry
        .after_returning("trace", selector.clone(), move |_| {
            push(&l, "after_returning");
            Ok(())
        })
        .unwrap();
    let l = Arc::clone(log);
    registry
        .after_throwing("trace", selector.clone(), move |_| {
            push(&l, "after_throwing");
            Ok(())
        })
        .unwrap();
    let l = Arc::clone(log);
    registry
        .after("trace", selector.clone(), move |_| {
            push(&l, "after");
            Ok(())
        })
        .unwrap();
    let l = Arc::clone(log);
    registry
        .around(
            "trace",
            selector,
            move |_op: &OperationInfo, proceed: Proceed<'_>| {
                push(&l, "around:enter");
                let out = proceed.call();
                push(&l, "around:exit");
                out
            },
        )
        .unwrap();

    Dispatcher::new(registry)
}

#[test]
fn successful_call_runs_the_full_order() {
    let log: Log = Arc::default();
    let dispatcher = full_chain(&log);

    let log_op = Arc::clone(&log);
    let value = dispatcher
        .invoke(lookup(), move || {
            push(&log_op, "operation");
            Ok(8_i64)
        })
        .unwrap();

    assert_eq!(value, 8);
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "around:enter",
            "before",
            "operation",
            "after_returning",
            "after",
            "around:exit",
        ]
    );
}

#[test]
fn failing_call_swaps_after_returning_for_after_throwing() {
    let log: Log = Arc::default();
    let dispatcher = full_chain(&log);

    let log_op = Arc::clone(&log);
    let result: Result<i64, _> = dispatcher.invoke(lookup(), move || {
        push(&log_op, "operation");
        Err(CallError::InvalidArgument("id cannot be -1".to_owned()))
    });

    assert!(matches!(result, Err(CallError::InvalidArgument(_))));
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "around:enter",
            "before",
            "operation",
            "after_throwing",
            "after",
            "around:exit",
        ]
    );
}

#[test]
fn non_matching_operation_sees_no_advice() {
    let log: Log = Arc::default();
    let dispatcher = full_chain(&log);

    let value = dispatcher
        .invoke(OperationInfo::new("report", "produce"), || Ok(1_i64))
        .unwrap();

    assert_eq!(value, 1);
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn each_advice_fires_exactly_once_per_call() {
    let log: Log = Arc::default();
    let dispatcher = full_chain(&log);

    dispatcher.invoke(lookup(), || Ok(())).unwrap();
    dispatcher.invoke(lookup(), || Ok(())).unwrap();

    let log = log.lock().unwrap();
    assert_eq!(log.iter().filter(|e| *e == "before").count(), 2);
    assert_eq!(log.iter().filter(|e| *e == "after_returning").count(), 2);
    assert_eq!(log.iter().filter(|e| *e == "after_throwing").count(), 0);
}

#[test]
fn around_failure_skips_inner_chain() {
    let log: Log = Arc::default();
    let registry = Arc::new(AdviceRegistry::new());

    registry
        .around(
            "refuse",
            Selector::any(),
            |op: &OperationInfo, _proceed: Proceed<'_>| {
                Err(CallError::AdviceFailure {
                    name: "refuse".to_owned(),
                    source: AdviceError::new(format!("{op} denied")),
                })
            },
        )
        .unwrap();
    let l = Arc::clone(&log);
    registry
        .before("trace", Selector::any(), move |_| {
            push(&l, "before");
            Ok(())
        })
        .unwrap();

    let dispatcher = Dispatcher::new(registry);
    let result: Result<i64, _> = dispatcher.invoke(lookup(), || Ok(1));

    assert!(matches!(result, Err(CallError::AdviceFailure { .. })));
    assert!(log.lock().unwrap().is_empty(), "inner chain must not run");
}

proptest! {
    /// Observers fire in registration order regardless of how many there are.
    #[test]
    fn before_advices_fire_in_registration_order(count in 1_usize..12) {
        let registry = Arc::new(AdviceRegistry::new());
        let log: Log = Arc::default();

        for index in 0..count {
            let l = Arc::clone(&log);
            registry
                .before(format!("advice-{index}"), Selector::any(), move |_| {
                    push(&l, index.to_string());
                    Ok(())
                })
                .unwrap();
        }

        let dispatcher = Dispatcher::new(registry);
        dispatcher.invoke(lookup(), || Ok(())).unwrap();

        let expected: Vec<String> = (0..count).map(|i| i.to_string()).collect();
        prop_assert_eq!(&*log.lock().unwrap(), &expected);
    }

    /// A matched chain of pure observers never changes the returned value.
    #[test]
    fn observed_calls_return_the_operation_value(value in any::<i64>()) {
        let log: Log = Arc::default();
        let dispatcher = full_chain(&log);

        let returned = dispatcher.invoke(lookup(), move || Ok(value)).unwrap();
        prop_assert_eq!(returned, value);
    }
}
