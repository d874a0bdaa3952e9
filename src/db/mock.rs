//! Mock database clients for testing.
//!
//! `MockDatabaseClient` records every statement it receives and answers
//! queries from canned data; `FailingDatabaseClient` rejects everything.

use super::{Cell, DatabaseBackend, DatabaseClient, ExecOutcome, ResultSet, Row};
use crate::error::{DemoError, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::sync::{Mutex, MutexGuard};

/// A statement received by the mock, with its bound parameters if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutedStatement {
    pub sql: String,
    pub params: Option<Vec<Vec<u8>>>,
}

/// Canned result returned for every query.
#[derive(Debug, Clone)]
struct CannedResult {
    columns: Vec<String>,
    rows: Vec<Row>,
}

/// A mock database client that returns predefined results.
#[derive(Debug)]
pub struct MockDatabaseClient {
    backend: DatabaseBackend,
    canned: Option<CannedResult>,
    executed: Mutex<Vec<ExecutedStatement>>,
}

impl MockDatabaseClient {
    /// Creates a new mock database client pretending to be PostgreSQL.
    pub fn new() -> Self {
        Self::for_backend(DatabaseBackend::Postgres)
    }

    /// Creates a mock that reports the given backend.
    pub fn for_backend(backend: DatabaseBackend) -> Self {
        Self {
            backend,
            canned: None,
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Makes every query return the given columns and rows.
    pub fn with_result(mut self, columns: &[&str], rows: Vec<Vec<Cell>>) -> Self {
        self.canned = Some(CannedResult {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        });
        self
    }

    /// Returns every statement executed or queried so far, in order.
    pub fn executed(&self) -> Vec<ExecutedStatement> {
        self.log().clone()
    }

    fn log(&self) -> MutexGuard<'_, Vec<ExecutedStatement>> {
        self.executed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, sql: &str, params: Option<Vec<Vec<u8>>>) -> ExecOutcome {
        let mut log = self.log();
        log.push(ExecutedStatement {
            sql: sql.to_string(),
            params,
        });

        let rows_affected = u64::from(sql.trim_start().to_uppercase().starts_with("INSERT"));
        let last_insert_id = match self.backend {
            DatabaseBackend::Mysql => Some(log.len() as u64),
            DatabaseBackend::Postgres => None,
        };
        ExecOutcome {
            rows_affected,
            last_insert_id,
        }
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
        self.backend
    }

    async fn execute_raw(&self, sql: &str) -> Result<ExecOutcome> {
        Ok(self.record(sql, None))
    }

    async fn execute_bound(&self, sql: &str, params: &[&[u8]]) -> Result<ExecOutcome> {
        let params = params.iter().map(|p| p.to_vec()).collect();
        Ok(self.record(sql, Some(params)))
    }

    async fn query<'a>(&'a self, sql: &'a str) -> Result<ResultSet<'a>> {
        self.record(sql, None);

        let canned = self.canned.clone().unwrap_or_else(|| CannedResult {
            columns: vec!["result".to_string()],
            rows: vec![vec![Some(format!("Mock result for: {sql}").into_bytes())]],
        });

        Ok(ResultSet {
            columns: canned.columns,
            rows: stream::iter(canned.rows.into_iter().map(Ok)).boxed(),
        })
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A database client whose every operation fails with a query error.
#[derive(Debug, Default)]
pub struct FailingDatabaseClient;

impl FailingDatabaseClient {
    fn failure(sql: &str) -> DemoError {
        DemoError::query(format!("ERROR: mock failure for: {sql}"))
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    fn backend(&self) -> DatabaseBackend {
        DatabaseBackend::Postgres
    }

    async fn execute_raw(&self, sql: &str) -> Result<ExecOutcome> {
        Err(Self::failure(sql))
    }

    async fn execute_bound(&self, sql: &str, _params: &[&[u8]]) -> Result<ExecOutcome> {
        Err(Self::failure(sql))
    }

    async fn query<'a>(&'a self, sql: &'a str) -> Result<ResultSet<'a>> {
        Err(Self::failure(sql))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
