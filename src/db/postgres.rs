//! PostgreSQL database client implementation.
//!
//! Provides the `PostgresClient` struct that implements the `DatabaseClient` trait
//! for PostgreSQL databases using sqlx.

use crate::config::ConnectionConfig;
use crate::db::{Cell, DatabaseBackend, DatabaseClient, ExecOutcome, ResultSet, Row};
use crate::error::{DemoError, Result};
use async_trait::async_trait;
use futures::StreamExt;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Column as SqlxColumn, Executor, Row as SqlxRow, Statement, TypeInfo, ValueRef};
use std::time::Duration;
use tracing::debug;

/// Time allowed to establish the connection.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL database client.
#[derive(Debug)]
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Connects to the database described by `config`.
    ///
    /// A single connection is opened; failures are not retried.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let conn_str = config.to_connection_string()?;
        debug!("Connecting to {}", config.display_string());

        let pool = PgPoolOptions::new()
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
impl DatabaseClient for PostgresClient {
    fn backend(&self) -> DatabaseBackend {
        DatabaseBackend::Postgres
    }

    async fn execute_raw(&self, sql: &str) -> Result<ExecOutcome> {
        let result = sqlx::raw_sql(sql)
            .execute(&self.pool)
            .await
            .map_err(|e| DemoError::query(format_query_error(e)))?;

        Ok(ExecOutcome::affected(result.rows_affected()))
    }

    async fn execute_bound(&self, sql: &str, params: &[&[u8]]) -> Result<ExecOutcome> {
        // Bound as BYTEA so values land in binary columns verbatim.
        let mut query = sqlx::query(sql);
        for param in params {
            query = query.bind(param.to_vec());
        }

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| DemoError::query(format_query_error(e)))?;

        Ok(ExecOutcome::affected(result.rows_affected()))
    }

    async fn query<'a>(&'a self, sql: &'a str) -> Result<ResultSet<'a>> {
        let statement = (&self.pool)
            .prepare(sql)
            .await
            .map_err(|e| DemoError::query(format_query_error(e)))?;

        let columns = statement
            .columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect();

        // Simple protocol: the server sends every value in its text form.
        let rows = sqlx::raw_sql(sql)
            .fetch(&self.pool)
            .map(|result| {
                result
                    .map_err(|e| DemoError::query(format_query_error(e)))
                    .and_then(|row| convert_row(&row))
            })
            .boxed();

        Ok(ResultSet { columns, rows })
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

/// Converts a sqlx PgRow to our Row type.
fn convert_row(row: &PgRow) -> Result<Row> {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| convert_cell(row, i, col.type_info().name()))
        .collect()
}

/// Converts a single text-format column value to its byte form.
///
/// BYTEA is hex-decoded back to the stored bytes and booleans are spelled
/// `true`/`false`. Every other type keeps the server's text rendering.
fn convert_cell(row: &PgRow, index: usize, type_name: &str) -> Result<Cell> {
    let raw = row.try_get_raw(index).map_err(scan_error)?;
    if raw.is_null() {
        return Ok(None);
    }

    let cell = match type_name.to_uppercase().as_str() {
        "BOOL" | "BOOLEAN" => row
            .try_get::<Option<bool>, _>(index)
            .map_err(scan_error)?
            .map(|v| v.to_string().into_bytes()),
        "BYTEA" => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .map_err(scan_error)?,
        _ => row
            .try_get_unchecked::<Option<String>, _>(index)
            .map_err(scan_error)?
            .map(String::into_bytes),
    };

    Ok(cell)
}

fn scan_error(error: sqlx::Error) -> DemoError {
    DemoError::query(format!("Failed to scan row: {error}"))
}

/// Maps sqlx connection errors to user-friendly messages.
fn map_connection_error(error: sqlx::Error, config: &ConnectionConfig) -> DemoError {
    let host = config.host();
    let port = config.port();
    let user = config.user();
    let database = config.database();

    let error_str = error.to_string().to_lowercase();

    if error_str.contains("connection refused") || error_str.contains("could not connect") {
        DemoError::connection(format!(
            "Cannot connect to {host}:{port}. Check that the server is running."
        ))
    } else if error_str.contains("password authentication failed")
        || error_str.contains("authentication failed")
    {
        DemoError::connection(format!(
            "Authentication failed for user '{user}'. Check your credentials."
        ))
    } else if error_str.contains("does not exist") && error_str.contains("database") {
        DemoError::connection(format!("Database '{database}' does not exist."))
    } else if error_str.contains("timed out") || error_str.contains("timeout") {
        DemoError::connection(format!(
            "Connection to {host}:{port} timed out. The server may be overloaded or unreachable."
        ))
    } else {
        DemoError::connection(error.to_string())
    }
}

/// Formats a query error with detail and hint if available.
fn format_query_error(error: sqlx::Error) -> String {
    let Some(db_error) = error.as_database_error() else {
        return error.to_string();
    };

    let mut result = String::from("ERROR: ");
    result.push_str(db_error.message());

    if let Some(pg_error) = db_error.try_downcast_ref::<sqlx::postgres::PgDatabaseError>() {
        if let Some(detail) = pg_error.detail() {
            result.push_str("\n  DETAIL: ");
            result.push_str(detail);
        }

        if let Some(hint) = pg_error.hint() {
            result.push_str("\n  HINT: ");
            result.push_str(hint);
        }
    }

    result
}
