use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::{CliArgs, Config, ConfigSource, DaemonConfig, LoggingConfig};

/// File name searched for when no `--config` is given
pub const CONFIG_FILE_NAME: &str = ".dmypy-bridge.toml";

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    daemon: Option<DaemonConfig>,
    logging: Option<LoggingConfig>,
}

impl Config {
    /// Discover and load configuration with precedence: CLI > file > defaults
    ///
    /// Uses the current working directory for config file discovery when no
    /// explicit path is provided in `cli_args`.
    pub fn discover(cli_args: &CliArgs) -> Result<Self> {
        let start_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::discover_from(&start_dir, cli_args)
    }

    /// Discover and load configuration starting from a specific directory
    ///
    /// This is the path-driven variant used by tests to avoid process-global state.
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self> {
        let mut config = Config::default();

        let config_path = match &cli_args.config_path {
            Some(explicit_path) => {
                if !explicit_path.exists() {
                    return Err(crate::ConfigError::NotFound {
                        path: explicit_path.display().to_string(),
                    }
                    .into());
                }
                Some(explicit_path.clone())
            }
            None => Self::discover_config_file_from(start_dir),
        };

        if let Some(path) = &config_path {
            let file_config = Self::load_config_file(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?;
            config.apply_file(file_config, ConfigSource::ConfigFile(path.clone()));
        }

        config.apply_cli(cli_args);
        config.validate()?;

        Ok(config)
    }

    fn apply_file(&mut self, file_config: TomlConfig, source: ConfigSource) {
        if let Some(daemon) = file_config.daemon {
            if daemon.program.is_some() {
                self.daemon.program = daemon.program;
                self.attribute("program", source.clone());
            }
            if daemon.program_args.is_some() {
                self.daemon.program_args = daemon.program_args;
                self.attribute("program_args", source.clone());
            }
            if daemon.status_file.is_some() {
                self.daemon.status_file = daemon.status_file;
                self.attribute("status_file", source.clone());
            }
            if daemon.timeout_secs.is_some() {
                self.daemon.timeout_secs = daemon.timeout_secs;
                self.attribute("timeout_secs", source.clone());
            }
            if daemon.project_dir.is_some() {
                self.daemon.project_dir = daemon.project_dir;
                self.attribute("project_dir", source.clone());
            }
        }

        if let Some(logging) = file_config.logging
            && logging.verbose.is_some()
        {
            self.logging.verbose = logging.verbose;
            self.attribute("verbose", source);
        }
    }

    fn apply_cli(&mut self, cli_args: &CliArgs) {
        if let Some(program) = &cli_args.program {
            self.daemon.program = Some(program.clone());
            // A program given on the command line replaces any configured prefix
            self.daemon.program_args = None;
            self.attribute("program", ConfigSource::Cli);
            self.attribute("program_args", ConfigSource::Cli);
        }
        if let Some(status_file) = &cli_args.status_file {
            self.daemon.status_file = Some(status_file.clone());
            self.attribute("status_file", ConfigSource::Cli);
        }
        if let Some(timeout) = cli_args.timeout_secs {
            self.daemon.timeout_secs = Some(timeout);
            self.attribute("timeout_secs", ConfigSource::Cli);
        }
        if let Some(dir) = &cli_args.project_dir {
            self.daemon.project_dir = Some(dir.clone());
            self.attribute("project_dir", ConfigSource::Cli);
        }
        // Only an explicit --verbose overrides the file
        if cli_args.verbose == Some(true) {
            self.logging.verbose = Some(true);
            self.attribute("verbose", ConfigSource::Cli);
        }
    }

    fn attribute(&mut self, key: &str, source: ConfigSource) {
        self.source_attribution.insert(key.to_string(), source);
    }

    /// Discover config file by searching upward from a given directory
    ///
    /// Walks up the directory tree looking for `.dmypy-bridge.toml`, stopping
    /// at repository root markers (.git, .hg, .svn) or filesystem root.
    #[must_use]
    pub fn discover_config_file_from(start_dir: &Path) -> Option<PathBuf> {
        let mut current_dir = Some(start_dir);

        while let Some(dir) = current_dir {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                return Some(config_path);
            }

            if dir.join(".git").exists() || dir.join(".hg").exists() || dir.join(".svn").exists()
            {
                break;
            }

            current_dir = dir.parent();
        }

        None
    }

    /// Load configuration from TOML file
    fn load_config_file(path: &Path) -> Result<TomlConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;
        Ok(config)
    }
}
