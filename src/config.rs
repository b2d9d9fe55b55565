//! Configuration Management
//!
//! Runtime settings for locating and running the FastTransfer binary.
//! Everything is environment-driven; there is no config file.
//!
//! # Environment Variables
//! - `FASTTRANSFER_PATH`: path to the FastTransfer binary (required to run
//!   or probe; preview and validation work without it)
//! - `FASTTRANSFER_TIMEOUT`: execution timeout in seconds (default 1800)
//! - `FASTTRANSFER_LOG_DIR`: directory for execution log files (default
//!   `<local data dir>/conveyor/logs`)

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ConveyorError, Result};

/// Default execution timeout: 30 minutes
pub const DEFAULT_TIMEOUT_SECS: u64 = 1800;

/// Resolved runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Path to the FastTransfer binary, if configured
    pub binary_path: Option<PathBuf>,

    /// Upper bound on a single execution
    pub timeout: Duration,

    /// Directory where execution logs are written
    pub log_dir: PathBuf,
}

impl Settings {
    /// Load settings from the environment
    pub fn from_env() -> Result<Self> {
        let binary_path = std::env::var_os("FASTTRANSFER_PATH").map(PathBuf::from);

        let timeout_secs = match std::env::var("FASTTRANSFER_TIMEOUT") {
            Err(_) => DEFAULT_TIMEOUT_SECS,
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                ConveyorError::config(format!(
                    "FASTTRANSFER_TIMEOUT must be a number of seconds, got '{raw}'"
                ))
            })?,
        };
        if timeout_secs == 0 {
            return Err(ConveyorError::config("FASTTRANSFER_TIMEOUT must be at least 1 second"));
        }

        let log_dir = match std::env::var_os("FASTTRANSFER_LOG_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_log_dir()?,
        };

        Ok(Self { binary_path, timeout: Duration::from_secs(timeout_secs), log_dir })
    }

    /// The configured binary path, or a configuration error naming the
    /// variable to set
    pub fn require_binary(&self) -> Result<&PathBuf> {
        self.binary_path.as_ref().ok_or_else(|| {
            ConveyorError::config(
                "FastTransfer binary not configured; set FASTTRANSFER_PATH to the binary location",
            )
        })
    }
}

/// Default log directory: `<local data dir>/conveyor/logs`
fn default_log_dir() -> Result<PathBuf> {
    let base = dirs::data_local_dir()
        .ok_or_else(|| ConveyorError::config("Could not determine user data directory"))?;
    Ok(base.join("conveyor").join("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout_applies() {
        std::env::remove_var("FASTTRANSFER_TIMEOUT");
        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_require_binary_errors_when_unset() {
        let settings = Settings {
            binary_path: None,
            timeout: Duration::from_secs(60),
            log_dir: PathBuf::from("/tmp"),
        };
        let err = settings.require_binary().unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        assert!(err.message().contains("FASTTRANSFER_PATH"));
    }

    #[test]
    fn test_require_binary_returns_configured_path() {
        let settings = Settings {
            binary_path: Some(PathBuf::from("/opt/fasttransfer/FastTransfer")),
            timeout: Duration::from_secs(60),
            log_dir: PathBuf::from("/tmp"),
        };
        assert_eq!(
            settings.require_binary().unwrap(),
            &PathBuf::from("/opt/fasttransfer/FastTransfer")
        );
    }
}
