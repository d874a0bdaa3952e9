//! MySQL database client implementation.
//!
//! Mirrors `PostgresClient` for MySQL servers. MySQL reports auto-increment
//! ids, so inserts carry a `last_insert_id`.

use crate::config::ConnectionConfig;
use crate::db::{Cell, DatabaseBackend, DatabaseClient, ExecOutcome, ResultSet, Row};
use crate::error::{DemoError, Result};
use async_trait::async_trait;
use futures::StreamExt;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlQueryResult, MySqlRow};
use sqlx::{Column as SqlxColumn, Executor, Row as SqlxRow, Statement, ValueRef};
use std::time::Duration;
use tracing::debug;

/// Time allowed to establish the connection.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// MySQL database client.
#[derive(Debug)]
pub struct MySqlClient {
    pool: MySqlPool,
}

impl MySqlClient {
    /// Connects to the database described by `config`.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let conn_str = config.to_connection_string()?;
        debug!("Connecting to {}", config.display_string());

        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .connect(&conn_str)
            .await
            .map_err(|e| map_connection_error(e, config))?;

        debug!("Successfully connected to database");
        Ok(Self { pool })
    }
}

#[async_trait]
impl DatabaseClient for MySqlClient {
    fn backend(&self) -> DatabaseBackend {
        DatabaseBackend::Mysql
    }

    async fn execute_raw(&self, sql: &str) -> Result<ExecOutcome> {
        let result = sqlx::raw_sql(sql)
            .execute(&self.pool)
            .await
            .map_err(query_error)?;

        Ok(outcome(&result))
    }

    async fn execute_bound(&self, sql: &str, params: &[&[u8]]) -> Result<ExecOutcome> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = query.bind(param.to_vec());
        }

        let result = query.execute(&self.pool).await.map_err(query_error)?;
        Ok(outcome(&result))
    }

    async fn query<'a>(&'a self, sql: &'a str) -> Result<ResultSet<'a>> {
        let statement = (&self.pool).prepare(sql).await.map_err(query_error)?;

        let columns = statement
            .columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect();

        // Text protocol: the server sends every value in its text form.
        let rows = sqlx::raw_sql(sql)
            .fetch(&self.pool)
            .map(|result| result.map_err(query_error).and_then(|row| convert_row(&row)))
            .boxed();

        Ok(ResultSet { columns, rows })
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

fn outcome(result: &MySqlQueryResult) -> ExecOutcome {
    ExecOutcome {
        rows_affected: result.rows_affected(),
        last_insert_id: Some(result.last_insert_id()),
    }
}

/// Converts a sqlx MySqlRow to our Row type.
///
/// Over the text protocol every cell arrives as the server rendered it:
/// numbers, dates and decimals as text, binary columns as stored.
fn convert_row(row: &MySqlRow) -> Result<Row> {
    (0..row.len()).map(|i| convert_cell(row, i)).collect()
}

fn convert_cell(row: &MySqlRow, index: usize) -> Result<Cell> {
    let raw = row.try_get_raw(index).map_err(scan_error)?;
    if raw.is_null() {
        return Ok(None);
    }

    row.try_get_unchecked::<Option<Vec<u8>>, _>(index)
        .map_err(scan_error)
}

fn scan_error(error: sqlx::Error) -> DemoError {
    DemoError::query(format!("Failed to scan row: {error}"))
}

fn query_error(error: sqlx::Error) -> DemoError {
    match error.as_database_error() {
        Some(db_error) => match db_error.code() {
            Some(code) => DemoError::query(format!("ERROR {code}: {}", db_error.message())),
            None => DemoError::query(format!("ERROR: {}", db_error.message())),
        },
        None => DemoError::query(error.to_string()),
    }
}

/// Maps sqlx connection errors to user-friendly messages.
fn map_connection_error(error: sqlx::Error, config: &ConnectionConfig) -> DemoError {
    let host = config.host();
    let port = config.port();
    let error_str = error.to_string().to_lowercase();

    if error_str.contains("connection refused") {
        DemoError::connection(format!(
            "Cannot connect to {host}:{port}. Check that the server is running."
        ))
    } else if error_str.contains("access denied") {
        DemoError::connection(format!(
            "Authentication failed for user '{}'. Check your credentials.",
            config.user()
        ))
    } else if error_str.contains("unknown database") {
        DemoError::connection(format!("Database '{}' does not exist.", config.database()))
    } else if error_str.contains("timed out") || error_str.contains("timeout") {
        DemoError::connection(format!(
            "Connection to {host}:{port} timed out. The server may be overloaded or unreachable."
        ))
    } else {
        DemoError::connection(error.to_string())
    }
}
