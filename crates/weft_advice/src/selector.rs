//! Selectors matching advice to operations.
//!
//! A [`Selector`] is the join-point rule of a registration: a labelled
//! predicate over [`OperationInfo`] that decides which operations the advice
//! applies to. Selectors are plain predicate functions supplied at
//! registration time; there is no annotation scanning or reflection.
//!
//! # Example
//!
//! ```
//! use weft_advice::operation::OperationInfo;
//! use weft_advice::selector::Selector;
//!
//! let repo_ops = Selector::target("employees");
//! assert!(repo_ops.matches(&OperationInfo::new("employees", "find_by_id")));
//! assert!(!repo_ops.matches(&OperationInfo::new("report", "produce")));
//! ```

use core::fmt;
use std::sync::Arc;

use crate::operation::OperationInfo;

/// A matching rule deciding which operations an advice applies to.
///
/// The predicate is shared behind an [`Arc`], so a selector can be cloned
/// cheaply and reused across several registrations.
#[derive(Clone)]
pub struct Selector {
    /// Human-readable label for debugging and logging.
    label: String,
    func: Arc<dyn Fn(&OperationInfo) -> bool + Send + Sync>,
}

impl Selector {
    /// Creates a selector from an arbitrary predicate.
    ///
    /// The label is used in `Debug` output and log lines; pick something a
    /// reader can map back to the rule (`employees::*`, `slow ops`, ...).
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        func: impl Fn(&OperationInfo) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            func: Arc::new(func),
        }
    }

    /// Matches every operation on the given target.
    #[must_use]
    pub fn target(target: &'static str) -> Self {
        Self::new(format!("{target}::*"), move |op| op.target() == target)
    }

    /// Matches exactly one operation.
    #[must_use]
    pub fn operation(target: &'static str, name: &'static str) -> Self {
        let info = OperationInfo::new(target, name);
        Self::new(info.to_string(), move |op| *op == info)
    }

    /// Matches every operation.
    #[must_use]
    pub fn any() -> Self {
        Self::new("*", |_| true)
    }

    /// Evaluates the selector against operation metadata.
    #[must_use]
    pub fn matches(&self, operation: &OperationInfo) -> bool {
        (self.func)(operation)
    }

    /// Returns the selector's label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector")
            .field("label", &self.label)
            .finish()
    }
}
