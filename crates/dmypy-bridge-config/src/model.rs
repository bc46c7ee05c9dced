use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Client program used when nothing else is configured
pub const DEFAULT_PROGRAM: &str = "dmypy";

/// Status file shared by every invocation so they all talk to one daemon session
pub const DEFAULT_STATUS_FILE: &str = ".mypy_cache/.dmypy.json";

/// Where a configuration value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Value provided via CLI argument (highest precedence).
    Cli,
    /// Value loaded from a configuration file.
    ConfigFile(PathBuf),
    /// Built-in default value (lowest precedence).
    Default,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cli => write!(f, "cli"),
            Self::ConfigFile(path) => write!(f, "config ({})", path.display()),
            Self::Default => write!(f, "default"),
        }
    }
}

/// How to reach the daemon client.
///
/// ```toml
/// [daemon]
/// program = "python"
/// program_args = ["-m", "mypy.dmypy"]
/// status_file = ".mypy_cache/.dmypy.json"
/// timeout_secs = 30
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DaemonConfig {
    /// Client executable (default: `dmypy`)
    pub program: Option<String>,
    /// Arguments placed before `--status-file`, e.g. `["-m", "mypy.dmypy"]`
    pub program_args: Option<Vec<String>>,
    /// Daemon status file (default: `.mypy_cache/.dmypy.json`)
    pub status_file: Option<String>,
    /// Per-invocation timeout; unset means wait indefinitely
    pub timeout_secs: Option<u64>,
    /// Working directory for invocations; unset means the bridge's own
    pub project_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
}

/// Effective configuration for one bridge process.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub daemon: DaemonConfig,
    pub logging: LoggingConfig,
    /// Source of each key that has been set
    pub source_attribution: HashMap<String, ConfigSource>,
}

impl Config {
    #[must_use]
    pub fn program(&self) -> &str {
        self.daemon.program.as_deref().unwrap_or(DEFAULT_PROGRAM)
    }

    #[must_use]
    pub fn program_args(&self) -> &[String] {
        self.daemon.program_args.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn status_file(&self) -> &str {
        self.daemon
            .status_file
            .as_deref()
            .unwrap_or(DEFAULT_STATUS_FILE)
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.daemon.timeout_secs.map(Duration::from_secs)
    }

    #[must_use]
    pub fn project_dir(&self) -> Option<&Path> {
        self.daemon.project_dir.as_deref()
    }

    #[must_use]
    pub fn verbose(&self) -> bool {
        self.logging.verbose.unwrap_or(false)
    }

    /// Source of a key, `Default` when it was never overridden.
    #[must_use]
    pub fn source_of(&self, key: &str) -> &ConfigSource {
        self.source_attribution
            .get(key)
            .unwrap_or(&ConfigSource::Default)
    }

    /// Effective values paired with their source, sorted by key.
    #[must_use]
    pub fn effective_config(&self) -> Vec<(&'static str, String, String)> {
        let mut entries = vec![
            ("program", self.program().to_string()),
            ("program_args", self.program_args().join(" ")),
            ("status_file", self.status_file().to_string()),
            (
                "timeout_secs",
                self.daemon
                    .timeout_secs
                    .map_or_else(|| "none".to_string(), |t| t.to_string()),
            ),
            (
                "project_dir",
                self.project_dir()
                    .map_or_else(|| ".".to_string(), |p| p.display().to_string()),
            ),
            ("verbose", self.verbose().to_string()),
        ];
        entries.sort_by_key(|(key, _)| *key);
        entries
            .into_iter()
            .map(|(key, value)| (key, value, self.source_of(key).to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reproduce_stock_invocation() {
        let config = Config::default();
        assert_eq!(config.program(), "dmypy");
        assert!(config.program_args().is_empty());
        assert_eq!(config.status_file(), ".mypy_cache/.dmypy.json");
        assert_eq!(config.timeout(), None);
        assert_eq!(config.project_dir(), None);
        assert!(!config.verbose());
    }

    #[test]
    fn test_effective_config_reports_sources() {
        let mut config = Config::default();
        config.daemon.program = Some("python".to_string());
        config
            .source_attribution
            .insert("program".to_string(), ConfigSource::Cli);

        let effective = config.effective_config();
        let program = effective.iter().find(|(k, _, _)| *k == "program").unwrap();
        assert_eq!(program.1, "python");
        assert_eq!(program.2, "cli");

        let status = effective
            .iter()
            .find(|(k, _, _)| *k == "status_file")
            .unwrap();
        assert_eq!(status.2, "default");
    }

    #[test]
    fn test_daemon_section_deserializes() {
        let daemon: DaemonConfig = toml::from_str(
            r#"
            program = "python"
            program_args = ["-m", "mypy.dmypy"]
            timeout_secs = 45
            "#,
        )
        .unwrap();
        assert_eq!(daemon.program.as_deref(), Some("python"));
        assert_eq!(
            daemon.program_args,
            Some(vec!["-m".to_string(), "mypy.dmypy".to_string()])
        );
        assert_eq!(daemon.timeout_secs, Some(45));
        assert_eq!(daemon.status_file, None);
    }
}
