#![forbid(unsafe_code)]

//! # mdansi CLI
//!
//! Renders markdown for the terminal.
//!
//! ## Usage
//!
//! ```bash
//! mdansi --in README.md       # Render a file
//! cat README.md | mdansi      # Render stdin
//! MDANSI_LOG=debug mdansi --in README.md
//! ```

use std::io;

use markdansi::Environment;
use mdansi::{is_broken_pipe, run, Cli};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    init_tracing(&cli);

    match run(&cli, &Environment::detect()) {
        Err(err) if is_broken_pipe(&err) => Ok(()),
        result => result,
    }
}

/// Logs go to stderr; `MDANSI_LOG` overrides the `-v` level.
fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_env("MDANSI_LOG")
        .unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
