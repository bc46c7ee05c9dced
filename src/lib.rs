//! dmypy-bridge - line-oriented bridge between an editor plugin and the mypy daemon
//!
//! The editor writes one command per line to the bridge's stdin; the bridge runs
//! the matching `dmypy` operation and answers on stdout. See [`bridge`] for the
//! output contract and [`protocol`] for the input format.
//!
//! # Library use
//!
//! The loop is generic over its streams and over the daemon client, so it can
//! be embedded or driven from tests:
//!
//! ```rust
//! use dmypy_bridge::{Bridge, DaemonClient, DaemonError, DaemonOutput, Request};
//!
//! struct AlwaysInt;
//!
//! impl DaemonClient for AlwaysInt {
//!     fn invoke(&self, _request: &Request<'_>) -> Result<DaemonOutput, DaemonError> {
//!         Ok(DaemonOutput { stdout: "builtins.int\n".into(), stderr: String::new(), exit_code: Some(0) })
//!     }
//! }
//!
//! let mut out = Vec::new();
//! let mut err = Vec::new();
//! Bridge::new(AlwaysInt)
//!     .serve(&b"m.py:1:1:1:2::inspect\n"[..], &mut out, &mut err)
//!     .unwrap();
//! assert_eq!(out, b"builtins.int\n");
//! ```

pub mod bridge;
pub mod cli;
pub mod daemon;
pub mod diagnostics;
pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod protocol;

pub use bridge::Bridge;
pub use daemon::{DaemonClient, DaemonError, DaemonOutput, Dmypy, Request};
pub use error::{BridgeError, DaemonFailure, UserFriendlyError};
pub use exit_codes::ExitCode;
pub use protocol::{Command, Opcode};

pub use dmypy_bridge_config::{CliArgs, Config, ConfigSource};
pub use dmypy_bridge_runner::{CommandSpec, NativeRunner, ProcessOutput, ProcessRunner};
