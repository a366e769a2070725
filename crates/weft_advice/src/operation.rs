//! Operation identity for interception.
//!
//! Every interceptable call is described by an [`OperationInfo`]: a stable
//! `{target, name}` pair identifying the component and the operation within
//! it. Selectors match on this metadata, and every [`CallEvent`] carries it.
//!
//! [`CallEvent`]: crate::event::CallEvent

use core::fmt;

/// Stable identity of an interceptable operation.
///
/// The `target` names the component (e.g. `employees`) and `name` the
/// operation within it (e.g. `find_by_id`). Displayed as `target::name`.
///
/// # Example
///
/// ```
/// use weft_advice::operation::OperationInfo;
///
/// let info = OperationInfo::new("employees", "find_by_id");
/// assert_eq!(info.to_string(), "employees::find_by_id");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationInfo {
    target: &'static str,
    name: &'static str,
}

impl OperationInfo {
    /// Creates operation metadata from a target and an operation name.
    #[must_use]
    pub const fn new(target: &'static str, name: &'static str) -> Self {
        Self { target, name }
    }

    /// Returns the target component name.
    #[must_use]
    pub const fn target(&self) -> &'static str {
        self.target
    }

    /// Returns the operation name within the target.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for OperationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.target, self.name)
    }
}
