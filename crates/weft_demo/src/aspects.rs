//! Prebuilt advice installers for the demo flows.
//!
//! Both installers take the registry and a selector, so the same cross-cutting
//! behavior can be pointed at any target.

use std::time::Instant;

use weft_advice::{
    AdviceRegistry, CallEvent, OperationInfo, Proceed, RegistrationError, Selector,
};

/// Registers one observer per advice kind plus an around wrapper, each
/// logging its lifecycle point for every operation the selector accepts.
///
/// # Errors
///
/// Fails when an advice named `trace` already exists for one of the kinds.
pub fn install_call_trace(
    registry: &AdviceRegistry,
    selector: &Selector,
) -> Result<(), RegistrationError> {
    registry
        .before("trace", selector.clone(), |event| {
            if let CallEvent::Started {
                operation, args, ..
            } = event
            {
                tracing::info!(operation = %operation, args = ?args, "before");
            }
            Ok(())
        })?
        .after_returning("trace", selector.clone(), |event| {
            if let CallEvent::Returned {
                operation, result, ..
            } = event
            {
                tracing::info!(operation = %operation, result = %result, "after returning");
            }
            Ok(())
        })?
        .after_throwing("trace", selector.clone(), |event| {
            if let CallEvent::Failed {
                operation, error, ..
            } = event
            {
                tracing::warn!(operation = %operation, error = %error, "after throwing");
            }
            Ok(())
        })?
        .after("trace", selector.clone(), |event| {
            tracing::info!(operation = %event.operation(), "after");
            Ok(())
        })?
        .around(
            "trace",
            selector.clone(),
            |operation: &OperationInfo, proceed: Proceed<'_>| {
                tracing::info!(operation = %operation, "around: entering");
                let outcome = proceed.call();
                tracing::info!(operation = %operation, "around: leaving");
                outcome
            },
        )?;
    Ok(())
}

/// Registers an around advice measuring wall-clock duration of every
/// operation the selector accepts, logged whether the call succeeds or fails.
///
/// # Errors
///
/// Fails when an around advice named `latency` already exists.
pub fn install_latency_logger(
    registry: &AdviceRegistry,
    selector: &Selector,
) -> Result<(), RegistrationError> {
    registry.around(
        "latency",
        selector.clone(),
        |operation: &OperationInfo, proceed: Proceed<'_>| {
            let started = Instant::now();
            let outcome = proceed.call();
            tracing::info!(
                operation = %operation,
                duration = ?started.elapsed(),
                "measured execution"
            );
            outcome
        },
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_advice::AdviceKind;

    #[test]
    fn call_trace_registers_every_kind() {
        let registry = AdviceRegistry::new();
        install_call_trace(&registry, &Selector::target("employees")).unwrap();

        for kind in [
            AdviceKind::Before,
            AdviceKind::AfterReturning,
            AdviceKind::AfterThrowing,
            AdviceKind::After,
            AdviceKind::Around,
        ] {
            assert!(registry.contains(kind, "trace"), "missing {kind} advice");
        }
    }

    #[test]
    fn latency_logger_registers_one_around() {
        let registry = AdviceRegistry::new();
        install_latency_logger(&registry, &Selector::target("report")).unwrap();

        assert_eq!(registry.advice_count(AdviceKind::Around), 1);
        assert!(registry.contains(AdviceKind::Around, "latency"));
    }

    #[test]
    fn installers_compose_on_one_registry() {
        let registry = AdviceRegistry::new();
        install_call_trace(&registry, &Selector::target("employees")).unwrap();
        install_latency_logger(&registry, &Selector::target("report")).unwrap();

        assert_eq!(registry.advice_count(AdviceKind::Around), 2);
    }
}
