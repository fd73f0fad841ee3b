//! Mock database client for testing.
//!
//! Returns scripted results or errors without touching a database, and counts
//! the statements it receives.

use super::{DatabaseBackend, DatabaseClient, TabularResult};
use crate::error::{GlanceError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// What the mock answers to every query.
#[derive(Debug, Clone)]
enum Script {
    Respond(TabularResult),
    Fail(String),
}

/// A mock database client that returns a predefined answer.
#[derive(Debug)]
pub struct MockDatabaseClient {
    script: Script,
    executed: Mutex<Vec<String>>,
    closes: AtomicUsize,
}

impl MockDatabaseClient {
    /// Creates a mock that answers every query with an empty result.
    pub fn new() -> Self {
        Self::with_result(TabularResult::new())
    }

    /// Creates a mock that answers every query with `result`.
    pub fn with_result(result: TabularResult) -> Self {
        Self {
            script: Script::Respond(result),
            executed: Mutex::new(Vec::new()),
            closes: AtomicUsize::new(0),
        }
    }

    /// Creates a mock whose every query fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            script: Script::Fail(message.into()),
            executed: Mutex::new(Vec::new()),
            closes: AtomicUsize::new(0),
        }
    }

    /// Returns the statements received so far.
    pub fn executed(&self) -> Vec<String> {
        self.executed
            .lock()
            .map(|sqls| sqls.clone())
            .unwrap_or_default()
    }

    /// Returns how many times `close` was called.
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl Default for MockDatabaseClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    fn backend(&self) -> DatabaseBackend {
        DatabaseBackend::Sqlite
    }

    async fn execute_query(&self, sql: &str) -> Result<TabularResult> {
        if let Ok(mut executed) = self.executed.lock() {
            executed.push(sql.to_string());
        }

        match &self.script {
            Script::Respond(result) => Ok(result.clone()),
            Script::Fail(message) => Err(GlanceError::query(message.clone())),
        }
    }

    async fn close(&self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
