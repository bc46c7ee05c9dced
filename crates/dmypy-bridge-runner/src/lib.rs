//! Process execution for the dmypy client
//!
//! Every daemon operation the bridge performs is one short-lived invocation of
//! the `dmypy` client program. This crate owns how that invocation is spawned,
//! waited on and captured.
//!
//! # Security Model
//!
//! All process execution goes through [`CommandSpec`] to ensure argv-style invocation.
//! Locations and symbol names arrive from the editor over stdin and are passed to
//! the client as discrete arguments, never through a shell.

pub mod command_spec;
pub mod error;
pub mod native;
pub mod process;

pub use command_spec::CommandSpec;
pub use error::RunnerError;
pub use native::NativeRunner;
pub use process::{ProcessOutput, ProcessRunner};
