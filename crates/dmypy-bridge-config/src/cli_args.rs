use std::path::PathBuf;

/// Overrides collected from the command line.
///
/// Every field is optional; `None` leaves the file or default value in place.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Explicit config file path (skips discovery)
    pub config_path: Option<PathBuf>,
    pub program: Option<String>,
    pub status_file: Option<String>,
    pub project_dir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub verbose: Option<bool>,
}
