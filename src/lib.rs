//! Explicit, composable interception for plain Rust operations.
//!

pub use weft_advice::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use weft_advice::prelude::*;
}
