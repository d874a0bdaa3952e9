//! Command-line argument parsing for poison-demo.
//!
//! Uses clap to parse the workload flags and connection settings.

use crate::config::ConnectionConfig;
use crate::db::DatabaseBackend;
use crate::error::{DemoError, Result};
use crate::fixtures::check_insert_count;
use clap::Parser;
use std::path::PathBuf;

/// Creates a test table, fills it with random or poison rows and prints it
/// in a binary-safe form.
#[derive(Parser, Debug)]
#[command(name = "poison-demo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Connection string (postgres://... or mysql://...)
    #[arg(value_name = "CONNECTION_STRING")]
    pub connection_string: Option<String>,

    /// Use MySQL instead of PostgreSQL
    #[arg(long)]
    pub mysql: bool,

    /// Use hex instead of base64 for binary values in query results
    #[arg(long)]
    pub hex: bool,

    /// Drop and create the test table
    #[arg(long)]
    pub create: bool,

    /// Drop the test table
    #[arg(long)]
    pub drop: bool,

    /// Insert N random rows
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub insert: usize,

    /// Insert values by binding variables instead of raw SQL text
    #[arg(long)]
    pub insert_bind: bool,

    /// Insert a poison record (payload in standard base64)
    #[arg(long, value_name = "BASE64")]
    pub insert_poison: Option<String>,

    /// Select up to N rows from the test table
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub select: usize,

    /// Select the row with this id
    #[arg(long, value_name = "ID")]
    pub id: Option<String>,

    /// Run an ad-hoc SQL statement
    #[arg(long, value_name = "SQL")]
    pub query: Option<String>,

    /// Database host
    #[arg(short = 'H', long, value_name = "HOST")]
    pub host: Option<String>,

    /// Database port
    #[arg(long, value_name = "PORT")]
    pub dbport: Option<u16>,

    /// Database name
    #[arg(short = 'd', long, value_name = "DATABASE")]
    pub database: Option<String>,

    /// Database user
    #[arg(short = 'U', long, value_name = "USER")]
    pub user: Option<String>,

    /// Database password
    #[arg(long, value_name = "PASSWORD", env = "POISON_DEMO_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Directory with usernames, passwords and emails corpora
    #[arg(long, value_name = "DIR")]
    pub testdata: Option<PathBuf>,

    /// Seed for the random generator (defaults to the current time)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Use mock database (in-memory, for testing)
    #[arg(long)]
    pub mock_db: bool,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Converts CLI arguments to a partial ConnectionConfig.
    ///
    /// A connection string wins over the individual flags; `--mysql` only
    /// picks the backend when no connection string is given.
    pub fn to_connection_config(&self) -> Result<ConnectionConfig> {
        if let Some(conn_str) = &self.connection_string {
            return ConnectionConfig::from_connection_string(conn_str);
        }

        Ok(ConnectionConfig {
            backend: self.mysql.then_some(DatabaseBackend::Mysql),
            host: self.host.clone(),
            port: self.dbport,
            database: self.database.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            sslmode: None,
        })
    }

    /// Returns the config file path to use.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::Config::default_path)
    }

    /// Returns the trimmed ad-hoc query, if any.
    pub fn query_sql(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|sql| !sql.is_empty())
    }

    /// Returns true if any table action was requested.
    pub fn has_action(&self) -> bool {
        self.create
            || self.drop
            || self.insert > 0
            || self.insert_poison.is_some()
            || self.select > 0
            || self.id.is_some()
            || self.query_sql().is_some()
    }

    /// Validates flag combinations before connecting.
    pub fn validate(&self) -> Result<()> {
        check_insert_count(self.insert)?;
        if self.connection_string.is_some() && self.mysql {
            return Err(DemoError::config(
                "--mysql cannot be combined with a connection string; use a mysql:// URL",
            ));
        }
        Ok(())
    }
}
