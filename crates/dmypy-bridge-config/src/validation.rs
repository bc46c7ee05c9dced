use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.program().trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "program".to_string(),
                value: "must not be empty".to_string(),
            });
        }

        if self.status_file().trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "status_file".to_string(),
                value: "must not be empty".to_string(),
            });
        }

        if let Some(timeout) = self.daemon.timeout_secs {
            if timeout == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "timeout_secs".to_string(),
                    value: "must be greater than 0".to_string(),
                });
            }
            if timeout > 3600 {
                return Err(ConfigError::InvalidValue {
                    key: "timeout_secs".to_string(),
                    value: "exceeds maximum limit of 3600 seconds (1 hour)".to_string(),
                });
            }
        }

        if let Some(dir) = self.project_dir()
            && !dir.is_dir()
        {
            return Err(ConfigError::NotFound {
                path: dir.display().to_string(),
            });
        }

        Ok(())
    }
}
