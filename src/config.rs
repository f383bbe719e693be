//! Execution configuration
//!
//! Read once at startup and passed by reference into every operation;
//! nothing in the execution layer consults the environment on its own.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{CmdboxError, Result};

/// Environment variable naming the working directory root
pub const ENV_WORKING_DIR: &str = "WORKING_DIR";
/// Environment variable overriding the default timeout, in seconds
pub const ENV_TIMEOUT: &str = "CMD_TIMEOUT";
/// Environment variable overriding the capture budget, in bytes
pub const ENV_MAX_OUTPUT_BYTES: &str = "CMD_MAX_OUTPUT_BYTES";

const DEFAULT_TIMEOUT_SECS: f64 = 30.0;
const DEFAULT_MAX_OUTPUT_BYTES: usize = 65536;

/// Immutable configuration shared by all invocations
#[derive(Debug, Clone)]
pub struct ExecConfig {
    /// Base directory where commands run and relative paths resolve
    pub root: PathBuf,
    /// Wall-clock timeout applied when a call does not override it
    pub default_timeout: Duration,
    /// Byte budget applied independently to captured stdout and stderr
    pub max_output_bytes: usize,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            root: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            default_timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS),
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

impl ExecConfig {
    /// Build a configuration from `WORKING_DIR`, `CMD_TIMEOUT`, and
    /// `CMD_MAX_OUTPUT_BYTES`, falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(root) = env::var(ENV_WORKING_DIR) {
            config.root = PathBuf::from(root);
        }

        if let Ok(raw) = env::var(ENV_TIMEOUT) {
            let secs: f64 = raw.parse().map_err(|_| {
                CmdboxError::InvalidConfig(format!("{ENV_TIMEOUT} is not a number: {raw:?}"))
            })?;
            if !secs.is_finite() || secs <= 0.0 {
                return Err(CmdboxError::InvalidConfig(format!(
                    "{ENV_TIMEOUT} must be a positive number of seconds, got {raw:?}"
                )));
            }
            config.default_timeout = Duration::from_secs_f64(secs);
        }

        if let Ok(raw) = env::var(ENV_MAX_OUTPUT_BYTES) {
            config.max_output_bytes = raw.parse().map_err(|_| {
                CmdboxError::InvalidConfig(format!(
                    "{ENV_MAX_OUTPUT_BYTES} is not a byte count: {raw:?}"
                ))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate invariants that hold for every constructed configuration
    pub fn validate(&self) -> Result<()> {
        if self.root.as_os_str().is_empty() {
            return Err(CmdboxError::InvalidConfig(
                "working directory root cannot be empty".to_string(),
            ));
        }

        if self.default_timeout.is_zero() {
            return Err(CmdboxError::InvalidConfig(
                "default timeout must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
