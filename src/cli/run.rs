//! CLI entry point
//!
//! `run()` parses flags, discovers configuration, sets up logging and serves
//! stdin until it closes. It prints every error itself; `main` only exits with
//! the returned code.

use clap::Parser;
use std::io::{self, Write};
use tracing::{debug, info, warn};

use super::args::Cli;
use crate::bridge::Bridge;
use crate::daemon::Dmypy;
use crate::error::BridgeError;
use crate::logging::init_tracing;
use crate::{Config, ExitCode, NativeRunner};

pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    let config = match Config::discover(&cli.to_cli_args()) {
        Ok(config) => config,
        Err(err) => return Err(report(&BridgeError::Config(err))),
    };

    if cli.print_config {
        return print_config(&config).map_err(|e| report(&BridgeError::Io(e)));
    }

    // A subscriber installed earlier (e.g. by an embedding process) is kept
    if let Err(e) = init_tracing(config.verbose()) {
        eprintln!("MYPY logging disabled: {e}");
    }

    for (key, value, source) in config.effective_config() {
        debug!(key, value = %value, source = %source, "Configuration");
    }
    check_program(config.program());

    let bridge = Bridge::new(Dmypy::new(NativeRunner::new(), &config));
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();

    match bridge.serve(stdin.lock(), &mut stdout, &mut stderr) {
        Ok(()) => Ok(()),
        Err(err) => Err(report(&err)),
    }
}

/// Print the user-facing report for `err` and pick the exit code.
fn report(err: &BridgeError) -> ExitCode {
    let code = err.to_exit_code();
    tracing::error!(error = %err, exit_code = code.as_i32(), "Bridge stopped");
    eprint!("{}", err.display_for_user());
    code
}

fn print_config(config: &Config) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    for (key, value, source) in config.effective_config() {
        writeln!(stdout, "{key:<14} = {value:<30} ({source})")?;
    }
    stdout.flush()
}

/// Warn early when the client cannot be found; the first call would fail anyway.
fn check_program(program: &str) {
    match which::which(program) {
        Ok(path) => info!(program, path = %path.display(), "Using daemon client"),
        Err(e) => warn!(program, error = %e, "Daemon client not found on PATH"),
    }
}
