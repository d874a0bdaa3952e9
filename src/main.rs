//! poison-demo - drives a fixed test table through a database or proxy.

use poison_demo::app::{self, WorkloadOptions};
use poison_demo::cli::Cli;
use poison_demo::config::{Config, ConnectionConfig};
use poison_demo::db::{self, DatabaseClient, MockDatabaseClient};
use poison_demo::error::Result;
use poison_demo::logging;
use tracing::{debug, error, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logging::init_stderr_logging();

    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    cli.validate()?;

    let config_path = cli.config_path();
    debug!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    if !cli.has_action() {
        warn!("Nothing to do. Use --help for usage information.");
        return Ok(());
    }

    let connection = resolve_connection(&cli, &config)?;
    let options = WorkloadOptions::from_cli(&cli, &config);

    let client: Box<dyn DatabaseClient> = if cli.mock_db {
        info!("Using mock database ({})", connection.backend().as_str());
        Box::new(MockDatabaseClient::for_backend(connection.backend()))
    } else {
        info!("Connecting to {}", connection.display_string());
        db::connect(&connection).await?
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = app::run(client.as_ref(), &options, &mut out).await;
    let closed = client.close().await;

    result.and(closed)
}

/// Resolves the connection with precedence: CLI, config file, environment,
/// built-in defaults.
fn resolve_connection(cli: &Cli, config: &Config) -> Result<ConnectionConfig> {
    let mut connection = config.connection.clone();
    connection.merge(&cli.to_connection_config()?);
    connection.apply_env_defaults();
    Ok(connection)
}
