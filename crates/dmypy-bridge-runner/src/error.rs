//! Error types for runner module

use thiserror::Error;

/// Failures to obtain a finished process from the dmypy client.
///
/// A client that ran to completion with a non-zero status is not an error at
/// this level; callers decide what a status means via [`ProcessOutput`](crate::ProcessOutput).
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to spawn '{program}': {reason}")]
    SpawnFailed { program: String, reason: String },

    #[error("Failed to wait for '{program}': {reason}")]
    WaitFailed { program: String, reason: String },

    #[error("Execution timed out after {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },
}
