//! Unified event enum for observer advices.
//!
//! All observer advices receive `&CallEvent` and can match on variants for
//! typed access to the invocation lifecycle.
//!
//! # Example
//!
//! ```ignore
//! use weft_advice::event::CallEvent;
//!
//! fn handle_event(event: &CallEvent) {
//!     match event {
//!         CallEvent::Started { operation, args, .. } => {
//!             println!("{operation} starting with {args:?}");
//!         }
//!         CallEvent::Returned { duration, .. } => {
//!             println!("completed in {duration:?}");
//!         }
//!         _ => {}
//!     }
//! }
//! ```

use core::fmt;
use core::time::Duration;

use crate::operation::OperationInfo;

/// Unified event passed to every observer advice.
///
/// Events carry rendered copies of arguments, results, and errors, so
/// observers can log or measure but never alter the live values flowing
/// through the call.
#[derive(Debug, Clone)]
pub enum CallEvent {
    /// Emitted before the real operation runs.
    Started {
        /// The operation being invoked.
        operation: OperationInfo,
        /// Rendered call arguments, in declaration order.
        args: Vec<String>,
        /// Identifier of this invocation, unique per call.
        call_id: String,
    },

    /// Emitted after the real operation returns successfully.
    Returned {
        /// The operation that completed.
        operation: OperationInfo,
        /// Identifier of this invocation.
        call_id: String,
        /// How long the invocation took.
        duration: Duration,
        /// Debug rendering of the returned value.
        result: String,
    },

    /// Emitted when the real operation fails.
    Failed {
        /// The operation that failed.
        operation: OperationInfo,
        /// Identifier of this invocation.
        call_id: String,
        /// How long the invocation took before failing.
        duration: Duration,
        /// Rendered operation error.
        error: String,
    },
}

impl CallEvent {
    /// Returns the operation this event belongs to.
    #[must_use]
    pub fn operation(&self) -> OperationInfo {
        match self {
            CallEvent::Started { operation, .. }
            | CallEvent::Returned { operation, .. }
            | CallEvent::Failed { operation, .. } => *operation,
        }
    }

    /// Returns the invocation id this event belongs to.
    #[must_use]
    pub fn call_id(&self) -> &str {
        match self {
            CallEvent::Started { call_id, .. }
            | CallEvent::Returned { call_id, .. }
            | CallEvent::Failed { call_id, .. } => call_id,
        }
    }

    /// Returns the measured duration for terminal events.
    ///
    /// `Started` has not completed yet and returns `None`.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        match self {
            CallEvent::Started { .. } => None,
            CallEvent::Returned { duration, .. } | CallEvent::Failed { duration, .. } => {
                Some(*duration)
            }
        }
    }
}

impl fmt::Display for CallEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallEvent::Started {
                operation, args, ..
            } => {
                write!(f, "Started({operation}, args: {args:?})")
            }
            CallEvent::Returned {
                operation,
                duration,
                result,
                ..
            } => {
                write!(
                    f,
                    "Returned({operation}, duration: {duration:?}, result: {result})"
                )
            }
            CallEvent::Failed {
                operation,
                duration,
                error,
                ..
            } => {
                write!(
                    f,
                    "Failed({operation}, duration: {duration:?}, error: {error})"
                )
            }
        }
    }
}
