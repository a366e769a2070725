//! Advice kinds and callback contracts.
//!
//! An advice is a named callback bound to a [`Selector`] and an
//! [`AdviceKind`]. Observer kinds (`Before`, `AfterReturning`,
//! `AfterThrowing`, `After`) receive a [`CallEvent`] and run for side effects
//! only. `Around` advices wrap the call: they receive the operation metadata
//! and a [`Proceed`] continuation, and decide whether and how the rest of the
//! chain runs.
//!
//! # Observer vs Around
//!
//! - **Observers**: react to lifecycle events (logging, metrics, tracing).
//!   They cannot change the call's result.
//! - **Around**: controls the call. It may run the continuation, skip it, or
//!   replace the result it produced.

use core::any::Any;
use core::fmt;
use std::sync::Arc;

use crate::dispatcher::CallError;
use crate::event::CallEvent;
use crate::operation::OperationInfo;
use crate::selector::Selector;

// ─────────────────────────────────────────────────────────────────────────────
// AdviceKind
// ─────────────────────────────────────────────────────────────────────────────

/// When an advice runs relative to the operation it wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdviceKind {
    /// Runs before the real operation.
    Before,
    /// Runs after the real operation returns successfully.
    AfterReturning,
    /// Runs when the real operation fails.
    AfterThrowing,
    /// Runs after the real operation, success or failure.
    After,
    /// Wraps the real operation and controls whether it executes.
    Around,
}

impl AdviceKind {
    /// Returns the kind's snake_case label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            AdviceKind::Before => "before",
            AdviceKind::AfterReturning => "after_returning",
            AdviceKind::AfterThrowing => "after_throwing",
            AdviceKind::After => "after",
            AdviceKind::Around => "around",
        }
    }

    /// True for the four observer kinds.
    #[must_use]
    pub const fn is_observer(&self) -> bool {
        !matches!(self, AdviceKind::Around)
    }
}

impl fmt::Display for AdviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Callback contracts
// ─────────────────────────────────────────────────────────────────────────────

/// Observer advice callback.
///
/// Receives the lifecycle event for its kind; a returned [`AdviceError`]
/// aborts the remaining advice chain.
pub type ObserverFn = dyn Fn(&CallEvent) -> Result<(), AdviceError> + Send + Sync;

/// Around advice callback.
///
/// Receives the operation metadata and the [`Proceed`] continuation holding
/// the rest of the chain (inner around advices, observers, and the real
/// operation). The returned box is the call's result as seen by everything
/// outside this advice.
pub type AroundFn = dyn for<'a> Fn(&OperationInfo, Proceed<'a>) -> Result<Box<dyn Any>, CallError>
    + Send
    + Sync;

/// Boxed remainder of an advice chain. Built and consumed by the dispatcher.
pub(crate) type Chain<'a> = Box<dyn FnOnce() -> Result<Box<dyn Any>, CallError> + 'a>;

/// Error reported by an observer advice.
///
/// Wrapped into [`CallError::AdviceFailure`] together with the advice name
/// before it reaches the caller.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct AdviceError(String);

impl AdviceError {
    /// Creates an advice error from a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Proceed
// ─────────────────────────────────────────────────────────────────────────────

/// Continuation handed to an around advice.
///
/// [`call`](Self::call) consumes the continuation, so an around advice can
/// run the rest of the chain at most once. Dropping the continuation without
/// calling it skips the real operation entirely; the advice must then supply
/// the boxed result itself.
pub struct Proceed<'a> {
    inner: Chain<'a>,
}

impl<'a> Proceed<'a> {
    pub(crate) fn new(inner: Chain<'a>) -> Self {
        Self { inner }
    }

    /// Runs the rest of the chain and yields the boxed result.
    ///
    /// # Errors
    ///
    /// Propagates the real operation's error or any advice failure raised
    /// further down the chain.
    pub fn call(self) -> Result<Box<dyn Any>, CallError> {
        (self.inner)()
    }
}

impl fmt::Debug for Proceed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proceed").finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AdviceRegistration
// ─────────────────────────────────────────────────────────────────────────────

/// The callback half of a registration.
pub enum AdviceCallback {
    /// Side-effect observer for the non-around kinds.
    Observe(Arc<ObserverFn>),
    /// Wrapping callback for [`AdviceKind::Around`].
    Around(Arc<AroundFn>),
}

impl fmt::Debug for AdviceCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdviceCallback::Observe(_) => f.write_str("Observe"),
            AdviceCallback::Around(_) => f.write_str("Around"),
        }
    }
}

/// A named advice bound to a selector and a kind.
///
/// Most users register through the typed [`AdviceRegistry`] methods instead
/// of building registrations directly.
///
/// [`AdviceRegistry`]: crate::registry::AdviceRegistry
pub struct AdviceRegistration {
    kind: AdviceKind,
    name: String,
    selector: Selector,
    callback: AdviceCallback,
}

impl AdviceRegistration {
    /// Creates an observer registration for one of the non-around kinds.
    #[must_use]
    pub fn observer<F>(
        kind: AdviceKind,
        name: impl Into<String>,
        selector: Selector,
        callback: F,
    ) -> Self
    where
        F: Fn(&CallEvent) -> Result<(), AdviceError> + Send + Sync + 'static,
    {
        Self {
            kind,
            name: name.into(),
            selector,
            callback: AdviceCallback::Observe(Arc::new(callback)),
        }
    }

    /// Creates an around registration.
    #[must_use]
    pub fn around<F>(name: impl Into<String>, selector: Selector, callback: F) -> Self
    where
        F: for<'a> Fn(&OperationInfo, Proceed<'a>) -> Result<Box<dyn Any>, CallError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            kind: AdviceKind::Around,
            name: name.into(),
            selector,
            callback: AdviceCallback::Around(Arc::new(callback)),
        }
    }

    pub(crate) fn from_parts(
        kind: AdviceKind,
        name: String,
        selector: Selector,
        callback: AdviceCallback,
    ) -> Self {
        Self {
            kind,
            name,
            selector,
            callback,
        }
    }

    /// Returns the advice kind.
    #[must_use]
    pub fn kind(&self) -> AdviceKind {
        self.kind
    }

    /// Returns the advice name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the selector this advice is bound to.
    #[must_use]
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub(crate) fn callback_ref(&self) -> &AdviceCallback {
        &self.callback
    }

    pub(crate) fn into_parts(self) -> (AdviceKind, String, Selector, AdviceCallback) {
        (self.kind, self.name, self.selector, self.callback)
    }
}

impl fmt::Debug for AdviceRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdviceRegistration")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("selector", &self.selector)
            .field("callback", &self.callback)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_labels() {
        assert_eq!(AdviceKind::Before.label(), "before");
        assert_eq!(AdviceKind::AfterReturning.label(), "after_returning");
        assert_eq!(AdviceKind::AfterThrowing.label(), "after_throwing");
        assert_eq!(AdviceKind::After.label(), "after");
        assert_eq!(AdviceKind::Around.label(), "around");
    }

    #[test]
    fn around_is_not_an_observer_kind() {
        assert!(AdviceKind::Before.is_observer());
        assert!(AdviceKind::After.is_observer());
        assert!(!AdviceKind::Around.is_observer());
    }

    #[test]
    fn advice_error_display() {
        let error = AdviceError::new("metrics sink unavailable");
        assert_eq!(error.to_string(), "metrics sink unavailable");
    }

    #[test]
    fn observer_registration_carries_metadata() {
        let registration = AdviceRegistration::observer(
            AdviceKind::Before,
            "trace",
            Selector::target("employees"),
            |_| Ok(()),
        );

        assert_eq!(registration.kind(), AdviceKind::Before);
        assert_eq!(registration.name(), "trace");
        assert_eq!(registration.selector().label(), "employees::*");
    }

    #[test]
    fn around_registration_has_around_kind() {
        let registration = AdviceRegistration::around(
            "latency",
            Selector::any(),
            |_op: &OperationInfo, proceed: Proceed<'_>| proceed.call(),
        );

        assert_eq!(registration.kind(), AdviceKind::Around);
    }
}
