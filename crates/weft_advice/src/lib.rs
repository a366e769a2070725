//! Explicit interception primitives for Weft (Layer 1).
//!
//! `weft_advice` provides the core abstractions for wrapping plain operations
//! with cross-cutting behavior — before / after-returning / after-throwing /
//! after / around advice — without modifying the operations themselves and
//! without proxies or reflection.
//!
//! # Core Concepts
//!
//! - [`OperationInfo`] - Stable `{target, name}` identity of a call
//! - [`Selector`] - Predicate deciding which operations an advice applies to
//! - [`AdviceRegistry`] - Named registrations, populated at composition time
//! - [`Dispatcher`] - Runs a call through the matching advice chain
//! - [`CallEvent`] - Lifecycle event observed by non-around advices
//! - [`Proceed`] - Continuation handed to around advice
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use weft_advice::prelude::*;
//!
//! let registry = Arc::new(AdviceRegistry::new());
//! registry.before("trace", Selector::target("employees"), |event| {
//!     // observers see the lifecycle, never the live values
//!     assert!(matches!(event, CallEvent::Started { .. }));
//!     Ok(())
//! })?;
//!
//! let dispatcher = Dispatcher::new(registry);
//! let value = dispatcher.invoke(
//!     OperationInfo::new("employees", "find_by_id"),
//!     || Ok(8_i64),
//! )?;
//! assert_eq!(value, 8);
//! # Ok::<(), Box<dyn core::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! Registration happens at an explicit composition root and is read-only once
//! dispatch begins: the dispatcher snapshots the matching registrations per
//! call, so concurrent invocations share the registry without coordination.

/// Advice kinds and callback contracts.
pub mod advice;

/// Invocation dispatch through the advice chain.
pub mod dispatcher;

/// Unified event enum for observer advices.
pub mod event;

/// Operation identity for interception.
pub mod operation;

/// Advice registration and lookup.
pub mod registry;

/// Selectors matching advice to operations.
pub mod selector;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::advice::{
        AdviceCallback, AdviceError, AdviceKind, AdviceRegistration, AroundFn, ObserverFn, Proceed,
    };
    pub use crate::dispatcher::{CallError, Dispatcher};
    pub use crate::event::CallEvent;
    pub use crate::operation::OperationInfo;
    pub use crate::registry::{AdviceRegistry, MatchedAdvice, RegistrationError};
    pub use crate::selector::Selector;
}

// Re-export key types at crate root for convenience
pub use advice::{AdviceError, AdviceKind, AdviceRegistration, Proceed};
pub use dispatcher::{CallError, Dispatcher};
pub use event::CallEvent;
pub use operation::OperationInfo;
pub use registry::{AdviceRegistry, MatchedAdvice, RegistrationError};
pub use selector::Selector;
