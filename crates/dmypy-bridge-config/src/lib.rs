//! Configuration management for dmypy-bridge
//!
//! Hierarchical configuration with discovery and precedence: CLI > file > defaults.
//! The file is `.dmypy-bridge.toml`, found by searching upward from the working
//! directory, with `[daemon]` and `[logging]` sections.

mod cli_args;
mod discovery;
mod error;
mod model;
mod validation;

pub use cli_args::CliArgs;
pub use discovery::CONFIG_FILE_NAME;
pub use error::ConfigError;
pub use model::*;
