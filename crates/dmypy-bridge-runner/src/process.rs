use crate::error::RunnerError;
use std::time::Duration;

use super::CommandSpec;

// ============================================================================
// ProcessRunner Trait - the seam between the bridge and real processes
// ============================================================================

/// Output from a finished process.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    /// Standard output from the process
    pub stdout: Vec<u8>,
    /// Standard error from the process
    pub stderr: Vec<u8>,
    /// Exit code from the process (None if terminated by signal)
    pub exit_code: Option<i32>,
}

impl ProcessOutput {
    #[must_use]
    pub fn new(stdout: Vec<u8>, stderr: Vec<u8>, exit_code: Option<i32>) -> Self {
        Self {
            stdout,
            stderr,
            exit_code,
        }
    }

    /// Get stdout as a UTF-8 string, lossy conversion.
    #[must_use]
    pub fn stdout_string(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Get stderr as a UTF-8 string, lossy conversion.
    #[must_use]
    pub fn stderr_string(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    /// Check if the process exited with code 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Trait for process execution.
///
/// Implementations MUST use argv-style APIs only (no shell string evaluation).
///
/// # Threading
///
/// `ProcessRunner` is synchronous. The bridge handles one input line at a time
/// and blocks on each client invocation, so there is nothing to gain from
/// exposing async here.
///
/// # Example
///
/// ```rust
/// use dmypy_bridge_runner::{CommandSpec, ProcessOutput, ProcessRunner, RunnerError};
/// use std::time::Duration;
///
/// struct Canned;
///
/// impl ProcessRunner for Canned {
///     fn run(&self, _cmd: &CommandSpec, _timeout: Option<Duration>) -> Result<ProcessOutput, RunnerError> {
///         Ok(ProcessOutput::new(b"Success: no issues found\n".to_vec(), Vec::new(), Some(0)))
///     }
/// }
///
/// let out = Canned.run(&CommandSpec::new("dmypy").arg("run"), None).unwrap();
/// assert!(out.success());
/// ```
pub trait ProcessRunner {
    /// Execute a command, waiting at most `timeout` when one is given.
    ///
    /// * `Ok(ProcessOutput)` - the process finished (possibly with non-zero exit code)
    /// * `Err(RunnerError::Timeout)` - the process was killed after the timeout
    /// * `Err(RunnerError::*)` - spawning or waiting failed
    fn run(&self, cmd: &CommandSpec, timeout: Option<Duration>)
    -> Result<ProcessOutput, RunnerError>;
}
