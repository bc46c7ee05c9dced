//! Error types for the bridge and their user-facing rendering.

use std::io;
use thiserror::Error;

use crate::daemon::DaemonError;
use crate::exit_codes::ExitCode;

pub use dmypy_bridge_config::ConfigError;

/// A daemon failure together with the stdout the client wrote before failing.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct DaemonFailure {
    /// Client stdout, possibly empty (the client never started)
    pub captured: String,
    pub error: DaemonError,
}

impl DaemonFailure {
    #[must_use]
    pub fn new(captured: impl Into<String>, error: DaemonError) -> Self {
        Self {
            captured: captured.into(),
            error,
        }
    }

    /// Kind name shown in `MYPY <kind>: <message>` lines
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.error.kind()
    }
}

/// Everything that can stop the bridge.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("I/O error on bridge streams: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Daemon(Box<DaemonFailure>),

    #[error(transparent)]
    Config(#[from] anyhow::Error),
}

impl From<DaemonFailure> for BridgeError {
    fn from(failure: DaemonFailure) -> Self {
        Self::Daemon(Box::new(failure))
    }
}

impl From<DaemonError> for BridgeError {
    fn from(error: DaemonError) -> Self {
        DaemonFailure::new(String::new(), error).into()
    }
}

/// Trait for errors that can be explained to whoever launched the bridge.
pub trait UserFriendlyError {
    fn user_message(&self) -> String;

    fn context(&self) -> Option<String>;

    fn suggestions(&self) -> Vec<String>;
}

impl UserFriendlyError for BridgeError {
    fn user_message(&self) -> String {
        match self {
            Self::Io(e) => format!("Lost contact with the editor: {e}"),
            Self::Daemon(failure) => format!("mypy daemon call failed: {}", failure.error),
            Self::Config(e) => format!("Configuration error: {e}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Io(_) => Some("Reading commands or writing results failed".to_string()),
            Self::Daemon(failure) => match &failure.error {
                DaemonError::Spawn { program, .. } => {
                    Some(format!("The client program `{program}` could not be started"))
                }
                DaemonError::Exit { opcode, .. } | DaemonError::Signal { opcode } => Some(
                    format!("`{opcode}` failures end the bridge so the editor can restart it"),
                ),
                DaemonError::Timeout { .. } => {
                    Some("The daemon did not answer within the configured timeout".to_string())
                }
            },
            Self::Config(e) => {
                let chain: Vec<String> = e.chain().skip(1).map(ToString::to_string).collect();
                (!chain.is_empty()).then(|| chain.join(": "))
            }
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Io(_) => vec!["Check that the editor plugin is still running".to_string()],
            Self::Daemon(failure) => match &failure.error {
                DaemonError::Spawn { .. } => vec![
                    "Install mypy in the project environment (`pip install mypy`)".to_string(),
                    "Point --program or [daemon] program at the dmypy client".to_string(),
                ],
                DaemonError::Exit { .. } | DaemonError::Signal { .. } => vec![
                    "Run `dmypy status` in the project to inspect the daemon".to_string(),
                    "Restart the daemon with `dmypy restart`".to_string(),
                ],
                DaemonError::Timeout { .. } => vec![
                    "Increase --timeout or [daemon] timeout_secs".to_string(),
                    "Restart the daemon with `dmypy restart`".to_string(),
                ],
            },
            Self::Config(_) => vec![
                format!(
                    "Check {} against the documented [daemon] and [logging] keys",
                    dmypy_bridge_config::CONFIG_FILE_NAME
                ),
                "Run with --help to see the accepted flags".to_string(),
            ],
        }
    }
}

impl BridgeError {
    /// Message with context and suggestions, in the form:
    ///
    /// ```text
    /// Error: <user message>
    ///
    /// Context: <context if available>
    ///
    /// Suggestions:
    ///   • <suggestion 1>
    /// ```
    #[must_use]
    pub fn display_for_user(&self) -> String {
        let mut output = format!("Error: {}\n", self.user_message());

        if let Some(ctx) = self.context() {
            output.push_str(&format!("\nContext: {ctx}\n"));
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in suggestions {
                output.push_str(&format!("  • {suggestion}\n"));
            }
        }

        output
    }

    #[must_use]
    pub fn to_exit_code(&self) -> ExitCode {
        match self {
            Self::Io(_) => ExitCode::INTERNAL,
            Self::Config(_) => ExitCode::CLI_ARGS,
            Self::Daemon(failure) => match failure.error {
                DaemonError::Timeout { .. } => ExitCode::TIMEOUT,
                _ => ExitCode::DAEMON_FAILURE,
            },
        }
    }
}
