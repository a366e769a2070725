//! Advice registration and lookup.
//!
//! The [`AdviceRegistry`] holds every advice registration for a process:
//! named callbacks bound to a [`Selector`] and an [`AdviceKind`]. The set is
//! populated at composition time and only read during dispatch — there is no
//! removal API, and no advice can add or remove registrations mid-call.
//!
//! # Example
//!
//! ```
//! use weft_advice::registry::AdviceRegistry;
//! use weft_advice::selector::Selector;
//!
//! let registry = AdviceRegistry::new();
//! registry
//!     .before("trace", Selector::target("employees"), |_event| {
//!         // log the event
//!         Ok(())
//!     })?
//!     .after("trace", Selector::target("employees"), |_event| Ok(()))?;
//! # Ok::<(), weft_advice::registry::RegistrationError>(())
//! ```

use core::any::Any;
use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::advice::{
    AdviceCallback, AdviceError, AdviceKind, AdviceRegistration, AroundFn, ObserverFn, Proceed,
};
use crate::dispatcher::CallError;
use crate::event::CallEvent;
use crate::operation::OperationInfo;
use crate::selector::Selector;

// ─────────────────────────────────────────────────────────────────────────────
// RegistrationError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during advice registration.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistrationError {
    /// An advice with this name already exists for the kind.
    #[error("advice '{name}' already registered as {kind}")]
    DuplicateName {
        /// The kind under which the duplicate was found.
        kind: AdviceKind,
        /// The duplicate advice name.
        name: String,
    },

    /// The callback shape does not match the advice kind.
    #[error("callback shape does not match advice kind '{kind}'")]
    KindMismatch {
        /// The kind the registration claimed.
        kind: AdviceKind,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// AdviceEntry
// ─────────────────────────────────────────────────────────────────────────────

/// Entry in the registry: name, selector, and the callback.
struct AdviceEntry {
    name: String,
    selector: Selector,
    callback: AdviceCallback,
}

// ─────────────────────────────────────────────────────────────────────────────
// MatchedAdvice
// ─────────────────────────────────────────────────────────────────────────────

/// Named observer callback cloned out of the registry for one dispatch.
pub(crate) type NamedObserver = (String, Arc<ObserverFn>);

/// Named around callback cloned out of the registry for one dispatch.
pub(crate) type NamedAround = (String, Arc<AroundFn>);

/// The registrations matching one operation, partitioned by kind.
///
/// Registration order is preserved within each kind. Callbacks are cheap
/// `Arc` clones taken while the registry lock was held, so a dispatch works
/// on a snapshot and never observes later registrations.
#[derive(Default)]
pub struct MatchedAdvice {
    pub(crate) before: Vec<NamedObserver>,
    pub(crate) after_returning: Vec<NamedObserver>,
    pub(crate) after_throwing: Vec<NamedObserver>,
    pub(crate) after: Vec<NamedObserver>,
    pub(crate) around: Vec<NamedAround>,
}

impl MatchedAdvice {
    /// True when no registration matched the operation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total matched registrations across all kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.before.len()
            + self.after_returning.len()
            + self.after_throwing.len()
            + self.after.len()
            + self.around.len()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AdviceRegistry
// ─────────────────────────────────────────────────────────────────────────────

/// Registry of advice registrations.
///
/// # Thread Safety
///
/// The registry uses interior mutability via [`RwLock`] to allow registration
/// during composition and concurrent reads during dispatch. Matching clones
/// the callbacks out of the lock, so dispatch never runs advice while the
/// lock is held.
#[derive(Default)]
pub struct AdviceRegistry {
    /// Maps advice kind to its registrations, in registration order.
    entries: RwLock<HashMap<AdviceKind, Vec<AdviceEntry>>>,
}

impl AdviceRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a before advice.
    ///
    /// The callback receives [`CallEvent::Started`] for every matching
    /// operation, before the real operation runs.
    ///
    /// # Errors
    ///
    /// Fails when a before advice with the same name already exists.
    pub fn before<F>(
        &self,
        name: impl Into<String>,
        selector: Selector,
        callback: F,
    ) -> Result<&Self, RegistrationError>
    where
        F: Fn(&CallEvent) -> Result<(), AdviceError> + Send + Sync + 'static,
    {
        self.register(AdviceRegistration::observer(
            AdviceKind::Before,
            name,
            selector,
            callback,
        ))?;
        Ok(self)
    }

    /// Registers an after-returning advice.
    ///
    /// The callback receives [`CallEvent::Returned`] when a matching
    /// operation completes successfully; it does not run on failure.
    ///
    /// # Errors
    ///
    /// Fails when an after-returning advice with the same name already
    /// exists.
    pub fn after_returning<F>(
        &self,
        name: impl Into<String>,
        selector: Selector,
        callback: F,
    ) -> Result<&Self, RegistrationError>
    where
        F: Fn(&CallEvent) -> Result<(), AdviceError> + Send + Sync + 'static,
    {
        self.register(AdviceRegistration::observer(
            AdviceKind::AfterReturning,
            name,
            selector,
            callback,
        ))?;
        Ok(self)
    }

    /// Registers an after-throwing advice.
    ///
    /// The callback receives [`CallEvent::Failed`] when a matching operation
    /// fails; it does not run on success.
    ///
    /// # Errors
    ///
    /// Fails when an after-throwing advice with the same name already exists.
    pub fn after_throwing<F>(
        &self,
        name: impl Into<String>,
        selector: Selector,
        callback: F,
    ) -> Result<&Self, RegistrationError>
    where
        F: Fn(&CallEvent) -> Result<(), AdviceError> + Send + Sync + 'static,
    {
        self.register(AdviceRegistration::observer(
            AdviceKind::AfterThrowing,
            name,
            selector,
            callback,
        ))?;
        Ok(self)
    }

    /// Registers an after advice.
    ///
    /// The callback receives the terminal event ([`CallEvent::Returned`] or
    /// [`CallEvent::Failed`]) for every matching operation, success or
    /// failure.
    ///
    /// # Errors
    ///
    /// Fails when an after advice with the same name already exists.
    pub fn after<F>(
        &self,
        name: impl Into<String>,
        selector: Selector,
        callback: F,
    ) -> Result<&Self, RegistrationError>
    where
        F: Fn(&CallEvent) -> Result<(), AdviceError> + Send + Sync + 'static,
    {
        self.register(AdviceRegistration::observer(
            AdviceKind::After,
            name,
            selector,
            callback,
        ))?;
        Ok(self)
    }

    /// Registers an around advice.
    ///
    /// The callback wraps the rest of the chain; see [`Proceed`] for the
    /// at-most-once contract.
    ///
    /// # Errors
    ///
    /// Fails when an around advice with the same name already exists.
    pub fn around<F>(
        &self,
        name: impl Into<String>,
        selector: Selector,
        callback: F,
    ) -> Result<&Self, RegistrationError>
    where
        F: for<'a> Fn(&OperationInfo, Proceed<'a>) -> Result<Box<dyn Any>, CallError>
            + Send
            + Sync
            + 'static,
    {
        self.register(AdviceRegistration::around(name, selector, callback))?;
        Ok(self)
    }

    /// Registers one observer callback under several kinds at once.
    ///
    /// Stored names are suffixed with `@<kind>` when more than one kind is
    /// given, so the individual registrations stay distinguishable.
    ///
    /// # Errors
    ///
    /// Fails on a duplicate name for any of the kinds, or when the kinds
    /// include [`AdviceKind::Around`] (around advice wraps the call and
    /// cannot be expressed as an observer).
    pub fn observe<F>(
        &self,
        kinds: &[AdviceKind],
        name: impl Into<String>,
        selector: &Selector,
        callback: F,
    ) -> Result<&Self, RegistrationError>
    where
        F: Fn(&CallEvent) -> Result<(), AdviceError> + Send + Sync + 'static,
    {
        let name = name.into();
        // Arc is shared so every kind invokes the same callback instance
        let callback: Arc<ObserverFn> = Arc::new(callback);

        for kind in kinds {
            let entry_name = if kinds.len() > 1 {
                format!("{name}@{kind}")
            } else {
                name.clone()
            };

            self.register(AdviceRegistration::from_parts(
                *kind,
                entry_name,
                selector.clone(),
                AdviceCallback::Observe(Arc::clone(&callback)),
            ))?;
        }
        Ok(self)
    }

    /// Registers a pre-built [`AdviceRegistration`].
    ///
    /// This is the lower-level method behind the typed registration helpers.
    ///
    /// # Errors
    ///
    /// Fails when the (kind, name) pair is already taken, or when the
    /// callback shape does not match the kind.
    pub fn register(&self, registration: AdviceRegistration) -> Result<(), RegistrationError> {
        let shape_matches = match (registration.kind(), registration.callback_ref()) {
            (AdviceKind::Around, AdviceCallback::Around(_)) => true,
            (kind, AdviceCallback::Observe(_)) if kind.is_observer() => true,
            _ => false,
        };
        if !shape_matches {
            return Err(RegistrationError::KindMismatch {
                kind: registration.kind(),
            });
        }

        let (kind, name, selector, callback) = registration.into_parts();

        let mut entries = self.entries.write();
        let list = entries.entry(kind).or_default();

        if list.iter().any(|entry| entry.name == name) {
            return Err(RegistrationError::DuplicateName { kind, name });
        }

        list.push(AdviceEntry {
            name,
            selector,
            callback,
        });
        Ok(())
    }

    /// Returns the registrations matching the operation, partitioned by kind.
    ///
    /// Registration order is preserved within each kind.
    #[must_use]
    pub fn matching(&self, operation: &OperationInfo) -> MatchedAdvice {
        let entries = self.entries.read();

        MatchedAdvice {
            before: collect_observers(&entries, AdviceKind::Before, operation),
            after_returning: collect_observers(&entries, AdviceKind::AfterReturning, operation),
            after_throwing: collect_observers(&entries, AdviceKind::AfterThrowing, operation),
            after: collect_observers(&entries, AdviceKind::After, operation),
            around: collect_around(&entries, operation),
        }
    }

    /// Returns the number of registrations for the given kind.
    #[must_use]
    pub fn advice_count(&self, kind: AdviceKind) -> usize {
        let entries = self.entries.read();
        entries.get(&kind).map_or(0, Vec::len)
    }

    /// Checks whether an advice with the given name exists for the kind.
    #[must_use]
    pub fn contains(&self, kind: AdviceKind, name: &str) -> bool {
        let entries = self.entries.read();
        entries
            .get(&kind)
            .is_some_and(|list| list.iter().any(|entry| entry.name == name))
    }

    /// True when nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let entries = self.entries.read();
        entries.values().all(Vec::is_empty)
    }
}

fn collect_observers(
    entries: &HashMap<AdviceKind, Vec<AdviceEntry>>,
    kind: AdviceKind,
    operation: &OperationInfo,
) -> Vec<NamedObserver> {
    entries.get(&kind).map_or_else(Vec::new, |list| {
        list.iter()
            .filter(|entry| entry.selector.matches(operation))
            .filter_map(|entry| match &entry.callback {
                AdviceCallback::Observe(callback) => {
                    Some((entry.name.clone(), Arc::clone(callback)))
                }
                AdviceCallback::Around(_) => None,
            })
            .collect()
    })
}

fn collect_around(
    entries: &HashMap<AdviceKind, Vec<AdviceEntry>>,
    operation: &OperationInfo,
) -> Vec<NamedAround> {
    entries.get(&AdviceKind::Around).map_or_else(Vec::new, |list| {
        list.iter()
            .filter(|entry| entry.selector.matches(operation))
            .filter_map(|entry| match &entry.callback {
                AdviceCallback::Around(callback) => {
                    Some((entry.name.clone(), Arc::clone(callback)))
                }
                AdviceCallback::Observe(_) => None,
            })
            .collect()
    })
}
