use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt, prelude::*};

/// Level for `-v`/`-q`, or `None` to defer to `RUST_LOG`.
fn level_for(verbosity: u8, quiet: bool) -> Option<LevelFilter> {
    if quiet {
        return Some(LevelFilter::OFF);
    }
    match verbosity {
        0 => None,
        1 => Some(LevelFilter::INFO),
        2 => Some(LevelFilter::DEBUG),
        _ => Some(LevelFilter::TRACE),
    }
}

/// Logs go to stderr so stdout carries only the result.
pub fn setup_logging(verbosity: u8, quiet: bool) -> Result<()> {
    let filter = match level_for(verbosity, quiet) {
        Some(level) => EnvFilter::default().add_directive(level.into()),
        None => EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy(),
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init()
        .context("failed to install the log subscriber")
}
