//! Client side of the mypy daemon
//!
//! [`DaemonClient`] is the seam the command loop talks to. [`Dmypy`] is the
//! production implementation: it turns each [`Request`] into one invocation of
//! the `dmypy` client program through a [`ProcessRunner`].

use dmypy_bridge_config::Config;
use dmypy_bridge_runner::{CommandSpec, ProcessOutput, ProcessRunner, RunnerError};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

use crate::protocol::Opcode;

/// Scratch file the editor plugin writes unsaved buffers to; always a check target
pub const TEMP_FILE: &str = ".mypy_cache/__mypy_plugin_temp__.py";

/// Display flags for a full check, in the order the client receives them
pub const CHECK_FLAGS: [&str; 4] = [
    "--show-error-end",
    "--no-pretty",
    "--hide-error-code-links",
    "--hide-error-context",
];

/// Positional targets of a full check
pub const CHECK_TARGETS: [&str; 2] = [".", TEMP_FILE];

/// One operation sent to the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request<'a> {
    /// Full check with the fixed flag and target set
    Check,
    /// Signature suggestion for a function, as JSON
    Suggest { symbol: &'a str },
    /// Inspect the expression at a `path:line:col:endline:endcol` location
    Inspect { location: &'a str },
}

impl Request<'_> {
    #[must_use]
    pub const fn opcode(&self) -> Opcode {
        match self {
            Self::Check => Opcode::Run,
            Self::Suggest { .. } => Opcode::Suggest,
            Self::Inspect { .. } => Opcode::Inspect,
        }
    }

    /// Subcommand and its arguments, without the global `--status-file` option.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::Check => ["run", "--"]
                .into_iter()
                .chain(CHECK_FLAGS)
                .chain(CHECK_TARGETS)
                .map(str::to_owned)
                .collect(),
            Self::Suggest { symbol } => {
                vec!["suggest".to_owned(), (*symbol).to_owned(), "--json".to_owned()]
            }
            Self::Inspect { location } => vec!["inspect".to_owned(), (*location).to_owned()],
        }
    }
}

/// Text a finished client invocation produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaemonOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the client was terminated by a signal
    pub exit_code: Option<i32>,
}

impl From<ProcessOutput> for DaemonOutput {
    fn from(output: ProcessOutput) -> Self {
        Self {
            stdout: output.stdout_string(),
            stderr: output.stderr_string(),
            exit_code: output.exit_code,
        }
    }
}

/// Why a daemon operation did not complete.
#[derive(Error, Debug)]
pub enum DaemonError {
    #[error("could not start {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("{opcode} exited with status {status}")]
    Exit { opcode: Opcode, status: i32 },

    #[error("{opcode} was terminated by a signal")]
    Signal { opcode: Opcode },

    #[error("{opcode} timed out after {timeout_seconds} seconds")]
    Timeout { opcode: Opcode, timeout_seconds: u64 },
}

impl DaemonError {
    /// Stable name of the failure, used in `MYPY <kind>: <message>` lines.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Spawn { .. } => "SpawnFailed",
            Self::Exit { .. } => "DaemonExit",
            Self::Signal { .. } => "DaemonKilled",
            Self::Timeout { .. } => "Timeout",
        }
    }

    fn from_runner(opcode: Opcode, err: RunnerError) -> Self {
        match err {
            RunnerError::SpawnFailed { program, reason }
            | RunnerError::WaitFailed { program, reason } => Self::Spawn { program, reason },
            RunnerError::Timeout { timeout_seconds } => Self::Timeout {
                opcode,
                timeout_seconds,
            },
        }
    }
}

impl DaemonOutput {
    /// Classify the exit status for `opcode`.
    pub fn check_status(&self, opcode: Opcode) -> Result<(), DaemonError> {
        match self.exit_code {
            Some(status) if opcode.accepts_status(status) => Ok(()),
            Some(status) => Err(DaemonError::Exit { opcode, status }),
            None => Err(DaemonError::Signal { opcode }),
        }
    }
}

/// Something that can carry out daemon requests.
///
/// Returning `Ok` means the client ran to completion, whatever its exit status;
/// status interpretation belongs to the caller via [`DaemonOutput::check_status`].
pub trait DaemonClient {
    fn invoke(&self, request: &Request<'_>) -> Result<DaemonOutput, DaemonError>;
}

/// `dmypy` driven through a [`ProcessRunner`].
#[derive(Debug, Clone)]
pub struct Dmypy<R> {
    runner: R,
    program: String,
    program_args: Vec<String>,
    status_file: String,
    project_dir: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl<R: ProcessRunner> Dmypy<R> {
    #[must_use]
    pub fn new(runner: R, config: &Config) -> Self {
        Self {
            runner,
            program: config.program().to_owned(),
            program_args: config.program_args().to_vec(),
            status_file: config.status_file().to_owned(),
            project_dir: config.project_dir().map(Path::to_path_buf),
            timeout: config.timeout(),
        }
    }

    /// Full argv for `request`: program prefix, `--status-file`, then the subcommand.
    #[must_use]
    pub fn command_for(&self, request: &Request<'_>) -> CommandSpec {
        let mut spec = CommandSpec::new(&self.program)
            .args(&self.program_args)
            .args(["--status-file", self.status_file.as_str()])
            .args(request.args());
        if let Some(dir) = &self.project_dir {
            spec = spec.cwd(dir);
        }
        spec
    }

    fn sentinel_path(&self) -> PathBuf {
        match &self.project_dir {
            Some(dir) => dir.join(TEMP_FILE),
            None => PathBuf::from(TEMP_FILE),
        }
    }

    /// Create the scratch file if it is missing so the check can name it.
    /// An existing file is left untouched.
    fn ensure_sentinel(&self) {
        let path = self.sentinel_path();
        if path.exists() {
            return;
        }
        let created = path
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|()| {
                OpenOptions::new()
                    .write(true)
                    .create_new(true)
                    .open(&path)
                    .map(drop)
            });
        match created {
            Ok(()) => debug!(path = %path.display(), "Created check scratch file"),
            // Lost a race with the editor creating it
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Could not create check scratch file"),
        }
    }
}

impl<R: ProcessRunner> DaemonClient for Dmypy<R> {
    fn invoke(&self, request: &Request<'_>) -> Result<DaemonOutput, DaemonError> {
        let opcode = request.opcode();
        if matches!(request, Request::Check) {
            self.ensure_sentinel();
        }

        let spec = self.command_for(request);
        debug!(opcode = %opcode, command = %spec, "Invoking daemon client");

        let started = Instant::now();
        let result = self.runner.run(&spec, self.timeout);
        let duration_ms = started.elapsed().as_millis();

        match result {
            Ok(output) => {
                debug!(
                    opcode = %opcode,
                    exit_code = ?output.exit_code,
                    duration_ms = %duration_ms,
                    "Daemon client finished"
                );
                Ok(output.into())
            }
            Err(err) => {
                warn!(opcode = %opcode, duration_ms = %duration_ms, error = %err, "Daemon client failed");
                Err(DaemonError::from_runner(opcode, err))
            }
        }
    }
}
