//! Demo services wired through `weft_advice`.
//!
//! Two independent flows share the interception core:
//!
//! - the employee directory (`employees` target), traced by one advice of
//!   every kind — see the `advice_kinds` binary;
//! - the report pipeline (`report` target), wrapped by a duration-measuring
//!   around advice — see the `report` binary.
//!
//! The services are deliberately thin; they exist to have something to
//! intercept. Each holds the [`Dispatcher`](weft_advice::Dispatcher) it
//! routes its operations through, and the binaries act as composition roots
//! constructing registry, dispatcher, and services explicitly.

/// Prebuilt advice installers for the demo flows.
pub mod aspects;

/// In-memory employee directory.
pub mod employees;

/// Three-stage report pipeline with simulated latency.
pub mod report;
