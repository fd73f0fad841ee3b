//! quake-glance: a terminal dashboard over a seismic event dataset.
//!
//! This library exposes the core modules for use in integration tests.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod connection;
pub mod db;
pub mod error;
pub mod logging;
pub mod output;
pub mod present;
pub mod query;
pub mod safety;
pub mod tui;
