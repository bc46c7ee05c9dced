//! Command-line interface
//!
//! - `args`: clap flag definitions
//! - `run`: entry point that wires configuration, logging and the command loop

pub mod args;
mod run;

pub use args::Cli;
pub use run::run;

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};
    use std::path::PathBuf;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_long_help_lists_every_input_form() {
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains(r##"full incremental check, then "# done!""##));
        assert!(help.contains("pkg/mod.py:4:5:4:12::run::inspect"));
        assert!(help.contains("stdin is closed"));
    }

    #[test]
    fn test_no_flags_leaves_everything_to_config() {
        let cli = Cli::try_parse_from(["dmypy-bridge"]).unwrap();
        let args = cli.to_cli_args();
        assert_eq!(args.program, None);
        assert_eq!(args.timeout_secs, None);
        assert_eq!(args.verbose, Some(false));
        assert!(!cli.print_config);
    }

    #[test]
    fn test_flags_map_to_overrides() {
        let cli = Cli::try_parse_from([
            "dmypy-bridge",
            "--program",
            "/venv/bin/dmypy",
            "--status-file",
            "state.json",
            "--project-dir",
            "/work",
            "--timeout",
            "45",
            "--config",
            "bridge.toml",
            "-v",
        ])
        .unwrap();
        let args = cli.to_cli_args();
        assert_eq!(args.program.as_deref(), Some("/venv/bin/dmypy"));
        assert_eq!(args.status_file.as_deref(), Some("state.json"));
        assert_eq!(args.project_dir, Some(PathBuf::from("/work")));
        assert_eq!(args.timeout_secs, Some(45));
        assert_eq!(args.config_path, Some(PathBuf::from("bridge.toml")));
        assert_eq!(args.verbose, Some(true));
    }

    #[test]
    fn test_non_numeric_timeout_rejected() {
        assert!(Cli::try_parse_from(["dmypy-bridge", "--timeout", "soon"]).is_err());
    }
}
