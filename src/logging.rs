//! Logging configuration for poison-demo.
//!
//! Logs go to stderr so that standard output carries only the rendered table.

use tracing_subscriber::EnvFilter;

/// Default filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "info";

/// Initializes logging to stderr.
///
/// `RUST_LOG` overrides the default `info` level.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Returns the filter from the environment, or the default.
fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
