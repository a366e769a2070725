//! Invocation dispatch through the advice chain.
//!
//! The [`Dispatcher`] is the explicit seam between a caller and an
//! interceptable operation: instead of calling the operation directly, the
//! caller hands it to [`Dispatcher::invoke`] together with its
//! [`OperationInfo`]. The dispatcher resolves matching registrations,
//! wraps the operation in the around chain, and runs the observers at their
//! lifecycle points.
//!
//! # Advice order
//!
//! ```text
//! around (first registered = outermost)
//!   └─ ... inner around advices ...
//!        └─ before advices (registration order)
//!           real operation
//!           after-returning | after-throwing advices
//!           after advices
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use weft_advice::dispatcher::Dispatcher;
//! use weft_advice::operation::OperationInfo;
//! use weft_advice::registry::AdviceRegistry;
//!
//! let registry = Arc::new(AdviceRegistry::new());
//! let dispatcher = Dispatcher::new(registry);
//!
//! let result = dispatcher.invoke(OperationInfo::new("math", "double"), || Ok(21 * 2));
//! assert_eq!(result.unwrap(), 42);
//! ```

use core::any::Any;
use core::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::advice::{AdviceError, Chain, Proceed};
use crate::event::CallEvent;
use crate::operation::OperationInfo;
use crate::registry::{AdviceRegistry, MatchedAdvice, NamedObserver};

// ─────────────────────────────────────────────────────────────────────────────
// CallError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors surfaced by [`Dispatcher::invoke`].
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// The real operation rejected its arguments.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An observer advice failed; the remaining chain was aborted.
    #[error("advice '{name}' failed: {source}")]
    AdviceFailure {
        /// Name of the failing advice.
        name: String,
        /// The advice's own error.
        #[source]
        source: AdviceError,
    },

    /// An around advice substituted a result of the wrong type.
    #[error("around advice substituted a result of the wrong type for {operation}")]
    ResultType {
        /// The operation whose result could not be recovered.
        operation: OperationInfo,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Invocation
// ─────────────────────────────────────────────────────────────────────────────

/// Ephemeral per-call record: operation identity, rendered arguments, call
/// id, and start instant. Produces the lifecycle events handed to observers
/// and is discarded when the call completes.
struct Invocation {
    operation: OperationInfo,
    args: Vec<String>,
    call_id: String,
    started_at: Instant,
}

impl Invocation {
    fn begin(operation: OperationInfo, args: Vec<String>) -> Self {
        Self {
            operation,
            args,
            call_id: nanoid::nanoid!(8),
            started_at: Instant::now(),
        }
    }

    fn started(&self) -> CallEvent {
        CallEvent::Started {
            operation: self.operation,
            args: self.args.clone(),
            call_id: self.call_id.clone(),
        }
    }

    fn returned(&self, result: String) -> CallEvent {
        CallEvent::Returned {
            operation: self.operation,
            call_id: self.call_id.clone(),
            duration: self.started_at.elapsed(),
            result,
        }
    }

    fn failed(&self, error: &CallError) -> CallEvent {
        CallEvent::Failed {
            operation: self.operation,
            call_id: self.call_id.clone(),
            duration: self.started_at.elapsed(),
            error: error.to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dispatcher
// ─────────────────────────────────────────────────────────────────────────────

/// Dispatches operation invocations through matching advice.
///
/// The dispatcher holds a shared [`AdviceRegistry`] and is itself cheap to
/// share; independent invocations may run concurrently from multiple threads,
/// since dispatch only reads the registry.
pub struct Dispatcher {
    registry: Arc<AdviceRegistry>,
}

impl Dispatcher {
    /// Creates a dispatcher over the given registry.
    #[must_use]
    pub fn new(registry: Arc<AdviceRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the registry this dispatcher consults.
    #[must_use]
    pub fn registry(&self) -> &AdviceRegistry {
        &self.registry
    }

    /// Invokes an operation that renders no arguments.
    ///
    /// See [`invoke_with_args`](Self::invoke_with_args).
    ///
    /// # Errors
    ///
    /// Same contract as [`invoke_with_args`](Self::invoke_with_args).
    pub fn invoke<T, F>(&self, operation: OperationInfo, real_op: F) -> Result<T, CallError>
    where
        T: fmt::Debug + 'static,
        F: FnOnce() -> Result<T, CallError>,
    {
        self.invoke_with_args(operation, Vec::new(), real_op)
    }

    /// Invokes an operation through the advice chain.
    ///
    /// Matching registrations are resolved from the registry as a snapshot,
    /// partitioned by kind. Around advices fold over a terminal continuation
    /// (first registered outermost); the terminal runs the before advices,
    /// the real operation, and then the after-returning/after-throwing and
    /// after advices. With no matching advice the call is handed straight to
    /// `real_op`.
    ///
    /// `args` are rendered argument values carried on the
    /// [`CallEvent::Started`] event for observers; they have no effect on the
    /// call itself.
    ///
    /// # Errors
    ///
    /// - the real operation's error, re-raised after the after-throwing and
    ///   after advices ran;
    /// - [`CallError::AdviceFailure`] as soon as an observer advice fails
    ///   (the remaining chain is skipped, never retried);
    /// - [`CallError::ResultType`] when an around advice substituted a value
    ///   the caller's type does not match.
    pub fn invoke_with_args<T, F>(
        &self,
        operation: OperationInfo,
        args: Vec<String>,
        real_op: F,
    ) -> Result<T, CallError>
    where
        T: fmt::Debug + 'static,
        F: FnOnce() -> Result<T, CallError>,
    {
        let matched = self.registry.matching(&operation);
        if matched.is_empty() {
            return real_op();
        }

        let MatchedAdvice {
            before,
            after_returning,
            after_throwing,
            after,
            around,
        } = matched;

        let invocation = Invocation::begin(operation, args);

        let terminal = move || -> Result<Box<dyn Any>, CallError> {
            run_observers(&before, &invocation.started())?;

            match real_op() {
                Ok(value) => {
                    let event = invocation.returned(format!("{value:?}"));
                    run_observers(&after_returning, &event)?;
                    run_observers(&after, &event)?;
                    Ok(Box::new(value))
                }
                Err(error) => {
                    let event = invocation.failed(&error);
                    run_observers(&after_throwing, &event)?;
                    run_observers(&after, &event)?;
                    Err(error)
                }
            }
        };

        // Fold the around chain; the first registered advice ends up outermost.
        let mut chain: Chain<'_> = Box::new(terminal);
        for (_name, callback) in around.into_iter().rev() {
            let inner = chain;
            chain = Box::new(move || callback(&operation, Proceed::new(inner)));
        }

        let value = chain()?;
        value
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| CallError::ResultType { operation })
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

fn run_observers(observers: &[NamedObserver], event: &CallEvent) -> Result<(), CallError> {
    for (name, callback) in observers {
        callback(event).map_err(|source| CallError::AdviceFailure {
            name: name.clone(),
            source,
        })?;
    }
    Ok(())
}
