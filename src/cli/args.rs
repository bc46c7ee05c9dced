//! Command-line flags
//!
//! Every flag is optional. Without any, the bridge talks to `dmypy` in the
//! current directory using `.mypy_cache/.dmypy.json` as the status file.

use clap::Parser;
use std::path::PathBuf;

use crate::CliArgs;

/// dmypy-bridge - stdin command bridge to the mypy daemon
#[derive(Parser, Debug)]
#[command(name = "dmypy-bridge")]
#[command(about = "Line-oriented bridge between an editor plugin and the mypy daemon")]
#[command(long_about = r##"
Reads one command per line from stdin and runs it against the mypy daemon.

INPUT LINES:
  run                               full incremental check, then "# done!"
  pkg.mod.func::suggest             signature suggestion as JSON, then "# done!"
  pkg/mod.py:4:5:4:12::inspect      type of the expression at the location
  pkg/mod.py:4:5:4:12::run::inspect check (output to stderr), then inspect

Results go to stdout, diagnostics and logs to stderr. The bridge exits when
stdin is closed.
"##)]
#[command(version)]
pub struct Cli {
    /// Path to a config file (default: search upward for .dmypy-bridge.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Daemon client program
    #[arg(long, value_name = "PATH")]
    pub program: Option<String>,

    /// Daemon status file shared by all invocations
    #[arg(long, value_name = "PATH")]
    pub status_file: Option<String>,

    /// Working directory for daemon invocations
    #[arg(long, value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    /// Per-invocation timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Print the effective configuration with value sources and exit
    #[arg(long)]
    pub print_config: bool,

    /// Debug-level logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Overrides for configuration discovery.
    #[must_use]
    pub fn to_cli_args(&self) -> CliArgs {
        CliArgs {
            config_path: self.config.clone(),
            program: self.program.clone(),
            status_file: self.status_file.clone(),
            project_dir: self.project_dir.clone(),
            timeout_secs: self.timeout,
            verbose: Some(self.verbose),
        }
    }
}
