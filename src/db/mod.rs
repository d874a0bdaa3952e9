//! Database abstraction layer for poison-demo.
//!
//! Provides a trait-based interface over the SQL endpoint so the workflow can
//! run against PostgreSQL, MySQL or an in-memory mock interchangeably.

mod mock;
mod mysql;
mod postgres;
pub mod statements;
mod types;

pub use mock::{ExecutedStatement, FailingDatabaseClient, MockDatabaseClient};
pub use mysql::MySqlClient;
pub use postgres::PostgresClient;
pub use types::{text_cell, Cell, ExecOutcome, ResultSet, Row, RowStream};

use crate::config::ConnectionConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    #[default]
    Postgres,
    Mysql,
}

impl DatabaseBackend {
    /// Returns the backend name, which is also its URL scheme.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Mysql => "mysql",
        }
    }

    /// Parses a backend from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Some(Self::Postgres),
            "mysql" => Some(Self::Mysql),
            _ => None,
        }
    }
}

/// Creates a database client for the configured backend.
pub async fn connect(config: &ConnectionConfig) -> Result<Box<dyn DatabaseClient>> {
    match config.backend() {
        DatabaseBackend::Postgres => {
            let client = PostgresClient::connect(config).await?;
            Ok(Box::new(client))
        }
        DatabaseBackend::Mysql => {
            let client = MySqlClient::connect(config).await?;
            Ok(Box::new(client))
        }
    }
}

/// Interface of the SQL execution endpoint.
///
/// Errors are reported as `DemoError::Query` or `DemoError::Connection` and are
/// never retried.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Returns the backend this client talks to.
    fn backend(&self) -> DatabaseBackend;

    /// Sends statement text exactly as given, without parameter binding.
    async fn execute_raw(&self, sql: &str) -> Result<ExecOutcome>;

    /// Executes a statement with positional parameters bound as binary values.
    async fn execute_bound(&self, sql: &str, params: &[&[u8]]) -> Result<ExecOutcome>;

    /// Runs a query and returns its columns plus a forward-only row stream.
    async fn query<'a>(&'a self, sql: &'a str) -> Result<ResultSet<'a>>;

    /// Closes the database connection.
    async fn close(&self) -> Result<()>;
}
