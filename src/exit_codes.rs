//! Exit codes for the bridge process.
//!
//! # Exit Code Table
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Input closed, all lines handled |
//! | 1 | `INTERNAL` | I/O failure on the bridge's own streams |
//! | 2 | `CLI_ARGS` | Invalid CLI arguments or configuration |
//! | 10 | `TIMEOUT` | A daemon call exceeded the configured timeout |
//! | 70 | `DAEMON_FAILURE` | A non-recoverable daemon call failed |

/// Process exit status, see the table in the module docs.
///
/// ```rust
/// use dmypy_bridge::ExitCode;
///
/// assert_eq!(ExitCode::DAEMON_FAILURE.as_i32(), 70);
/// assert_eq!(i32::from(ExitCode::SUCCESS), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Input closed
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Bridge stream I/O failure or other internal error
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// Invalid command line or configuration file
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// Daemon call timed out
    pub const TIMEOUT: ExitCode = ExitCode(10);

    /// Daemon call failed during `run` or `suggest`
    pub const DAEMON_FAILURE: ExitCode = ExitCode(70);

    /// Numeric value for `std::process::exit()`.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}
