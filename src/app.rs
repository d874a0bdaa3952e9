//! Workload driver for poison-demo.
//!
//! Runs the requested actions against one database client in a fixed order:
//! create, drop, random inserts, poison insert, table select, ad-hoc query.
//! The first failure aborts the remaining actions.

use std::io::Write;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::STANDARD, Engine};
use futures::TryStreamExt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::cli::Cli;
use crate::config::Config;
use crate::db::statements;
use crate::db::{DatabaseClient, ResultSet};
use crate::error::{DemoError, Result};
use crate::fixtures::{check_insert_count, FixtureSet};
use crate::render::{BinaryEncoding, TableWriter};

/// Everything the driver needs to know about one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkloadOptions {
    /// Drop and recreate `test_table`.
    pub create: bool,
    /// Drop `test_table`.
    pub drop: bool,
    /// Number of random rows to insert.
    pub insert: usize,
    /// Bind insert values instead of splicing them into the SQL text.
    pub insert_bind: bool,
    /// Standard base64 payload for a poison record.
    pub insert_poison: Option<String>,
    /// Row limit for the table select; 0 means no limit.
    pub select: usize,
    /// Id filter for the table select, appended verbatim.
    pub id: Option<String>,
    /// Ad-hoc statement.
    pub query: Option<String>,
    /// Display of non-UTF-8 cells.
    pub encoding: BinaryEncoding,
    /// Directory holding the corpora.
    pub testdata: PathBuf,
    /// RNG seed; the current time when unset.
    pub seed: Option<u64>,
}

impl WorkloadOptions {
    /// Builds options from parsed arguments, falling back to the config file.
    pub fn from_cli(cli: &Cli, config: &Config) -> Self {
        Self {
            create: cli.create,
            drop: cli.drop,
            insert: cli.insert,
            insert_bind: cli.insert_bind,
            insert_poison: cli.insert_poison.clone(),
            select: cli.select,
            id: cli.id.clone(),
            query: cli.query_sql().map(String::from),
            encoding: BinaryEncoding::from_prefer_hex(cli.hex || config.hex),
            testdata: cli
                .testdata
                .clone()
                .unwrap_or_else(|| config.testdata_dir()),
            seed: cli.seed,
        }
    }

    fn wants_select(&self) -> bool {
        self.select > 0 || self.id.is_some()
    }
}

/// Runs every requested action, writing result tables to `out`.
pub async fn run<W: Write>(
    client: &dyn DatabaseClient,
    options: &WorkloadOptions,
    out: &mut W,
) -> Result<()> {
    if options.create {
        execute_all(client, &statements::create_table(client.backend())).await?;
        info!("Table has been successfully created");
    }

    if options.drop {
        execute_all(client, &statements::drop_table(client.backend())).await?;
        info!("Table has been successfully dropped");
    }

    if options.insert > 0 {
        insert_random(client, options).await?;
        info!("Insert has been successful");
    }

    if let Some(payload) = &options.insert_poison {
        insert_poison(client, payload).await?;
        info!("Poison record insert has been successful");
    }

    if options.wants_select() {
        let limit = (options.select > 0).then_some(options.select);
        let sql = statements::select(options.id.as_deref(), limit);
        print_query(client, &sql, options.encoding, out).await?;
        info!("Select has been successful");
    }

    if let Some(sql) = &options.query {
        if statements::returns_rows(sql) {
            print_query(client, sql, options.encoding, out).await?;
        } else {
            let outcome = client.execute_raw(sql).await?;
            info!("{outcome}");
        }
    }

    Ok(())
}

async fn execute_all(client: &dyn DatabaseClient, statements: &[String]) -> Result<()> {
    for sql in statements {
        debug!("Executing: {sql}");
        client.execute_raw(sql).await?;
    }
    Ok(())
}

/// Inserts `options.insert` rows drawn from the corpora.
async fn insert_random(client: &dyn DatabaseClient, options: &WorkloadOptions) -> Result<()> {
    check_insert_count(options.insert)?;

    let fixtures = FixtureSet::load(&options.testdata)?;
    let seed = options.seed.unwrap_or_else(time_seed);
    debug!("Fixture RNG seed: {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    let bound_sql = options
        .insert_bind
        .then(|| statements::insert_bound(client.backend()));

    for _ in 0..options.insert {
        let row = fixtures.next_row(&mut rng)?;
        let outcome = match &bound_sql {
            Some(sql) => {
                let params = [
                    row.username.as_bytes(),
                    row.password.as_bytes(),
                    row.email.as_bytes(),
                ];
                client.execute_bound(sql, &params).await?
            }
            None => client.execute_raw(&statements::insert_raw(&row)).await?,
        };
        info!("{outcome}");
    }

    Ok(())
}

/// Decodes a standard base64 payload and inserts it as a poison record.
async fn insert_poison(client: &dyn DatabaseClient, payload: &str) -> Result<()> {
    let value = decode_poison(payload)?;
    client
        .execute_raw(&statements::insert_poison(&value))
        .await?;
    Ok(())
}

/// Decodes the `--insert-poison` argument.
pub fn decode_poison(payload: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(payload.trim())
        .map_err(|e| DemoError::decode(format!("Poison record is not valid base64: {e}")))
}

/// Runs a query and streams its rendered table into `out`.
///
/// Returns the number of rows printed.
pub async fn print_query<W: Write>(
    client: &dyn DatabaseClient,
    sql: &str,
    encoding: BinaryEncoding,
    out: &mut W,
) -> Result<usize> {
    let ResultSet { columns, mut rows } = client.query(sql).await?;

    let mut table = TableWriter::new(out, encoding);
    table.write_header(&columns)?;
    while let Some(row) = rows.try_next().await? {
        table.write_row(&row)?;
    }

    let count = table.rows_written();
    table.finish()?;
    debug!("Printed {count} rows");
    Ok(count)
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
