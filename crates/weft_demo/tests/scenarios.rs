//! Demo scenarios: the flows the binaries run, assertable end to end.

use core::time::Duration;
use std::sync::{Arc, Mutex};

use weft_advice::prelude::*;
use weft_demo::aspects::{install_call_trace, install_latency_logger};
use weft_demo::employees::{Employee, EmployeeDirectory};
use weft_demo::report::ReportPipeline;

#[test]
fn traced_lookup_succeeds_and_fires_the_chain() {
    let registry = Arc::new(AdviceRegistry::new());
    install_call_trace(&registry, &Selector::target(EmployeeDirectory::TARGET)).unwrap();

    let stages: Arc<Mutex<Vec<String>>> = Arc::default();
    let stages_clone = Arc::clone(&stages);
    registry
        .observe(
            &[AdviceKind::Before, AdviceKind::AfterReturning],
            "probe",
            &Selector::target(EmployeeDirectory::TARGET),
            move |event| {
                let stage = match event {
                    CallEvent::Started { .. } => "started",
                    CallEvent::Returned { .. } => "returned",
                    CallEvent::Failed { .. } => "failed",
                };
                stages_clone.lock().unwrap().push(stage.to_owned());
                Ok(())
            },
        )
        .unwrap();

    let directory = EmployeeDirectory::new(Arc::new(Dispatcher::new(registry)));
    let employee = directory.find_by_id(8).unwrap();

    assert_eq!(employee, Employee { id: 8 });
    assert_eq!(*stages.lock().unwrap(), vec!["started", "returned"]);
}

#[test]
fn sentinel_lookup_fails_and_only_after_throwing_observes_it() {
    let registry = Arc::new(AdviceRegistry::new());

    let failures: Arc<Mutex<Vec<String>>> = Arc::default();
    let failures_clone = Arc::clone(&failures);
    registry
        .after_throwing(
            "probe",
            Selector::target(EmployeeDirectory::TARGET),
            move |event| {
                if let CallEvent::Failed { error, .. } = event {
                    failures_clone.lock().unwrap().push(error.clone());
                }
                Ok(())
            },
        )
        .unwrap();
    registry
        .after_returning("probe", Selector::target(EmployeeDirectory::TARGET), |_| {
            panic!("after-returning must not fire for a failing call");
        })
        .unwrap();

    let directory = EmployeeDirectory::new(Arc::new(Dispatcher::new(registry)));
    let result = directory.find_by_id(-1);

    assert!(matches!(result, Err(CallError::InvalidArgument(_))));
    let failures = failures.lock().unwrap();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("id cannot be -1"));
}

#[test]
fn pipeline_stages_run_in_order_with_measured_durations() {
    let registry = Arc::new(AdviceRegistry::new());
    install_latency_logger(&registry, &Selector::target(ReportPipeline::TARGET)).unwrap();

    let observed: Arc<Mutex<Vec<(String, Duration)>>> = Arc::default();
    let observed_clone = Arc::clone(&observed);
    registry
        .after(
            "probe",
            Selector::target(ReportPipeline::TARGET),
            move |event| {
                if let Some(duration) = event.duration() {
                    observed_clone
                        .lock()
                        .unwrap()
                        .push((event.operation().name().to_owned(), duration));
                }
                Ok(())
            },
        )
        .unwrap();

    let delay = Duration::from_millis(20);
    let pipeline = ReportPipeline::new(Arc::new(Dispatcher::new(registry)))
        .with_produce_delay(delay)
        .with_format_delay(delay)
        .with_persist_delay(delay);

    pipeline.run().unwrap();

    let observed = observed.lock().unwrap();
    let names: Vec<_> = observed.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["produce", "format", "persist"]);
    for (name, duration) in observed.iter() {
        assert!(
            *duration >= delay,
            "{name} measured {duration:?}, expected at least {delay:?}"
        );
    }
}

#[test]
fn directory_and_pipeline_share_one_registry_without_crosstalk() {
    let registry = Arc::new(AdviceRegistry::new());

    let employee_events: Arc<Mutex<usize>> = Arc::default();
    let counter = Arc::clone(&employee_events);
    registry
        .before(
            "probe",
            Selector::target(EmployeeDirectory::TARGET),
            move |_| {
                *counter.lock().unwrap() += 1;
                Ok(())
            },
        )
        .unwrap();

    let dispatcher = Arc::new(Dispatcher::new(registry));
    let directory = EmployeeDirectory::new(Arc::clone(&dispatcher));
    let pipeline = ReportPipeline::new(dispatcher)
        .with_produce_delay(Duration::from_millis(1))
        .with_format_delay(Duration::from_millis(1))
        .with_persist_delay(Duration::from_millis(1));

    directory.find_by_id(8).unwrap();
    pipeline.run().unwrap();

    assert_eq!(
        *employee_events.lock().unwrap(),
        1,
        "pipeline operations must not match the employees selector"
    );
}
