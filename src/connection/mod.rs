//! Connection management for quake-glance.
//!
//! Owns the single, lazily opened database handle shared by every query.

pub mod provider;

pub use provider::{BackendConnector, ConnectionHandle, ConnectionProvider, Connector};
