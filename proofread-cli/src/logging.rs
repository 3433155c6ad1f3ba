use std::io::IsTerminal;

use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

/// Default filter directive for a verbosity level.
///
/// `quiet` keeps only findings and errors; each `-v` raises the level once.
#[must_use]
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "warn";
    }
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber: stderr, no targets, colors only on a terminal.
///
/// `RUST_LOG` takes precedence over the verbosity flags.
///
/// # Errors
///
/// Fails if a subscriber is already installed.
pub fn init(verbose: u8, quiet: bool) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive(verbose, quiet))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}
