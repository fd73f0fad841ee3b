//! Query execution for quake-glance.
//!
//! Isolates SQL execution and outcome classification from the frontends.

pub mod executor;

pub use executor::{ExecutionOutcome, FailureKind, QueryExecutor};
