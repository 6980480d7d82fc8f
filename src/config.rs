use crate::core::{ExecError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Journal modes SQLite accepts for `PRAGMA journal_mode`.
const JOURNAL_MODES: &[&str] = &["DELETE", "TRUNCATE", "PERSIST", "MEMORY", "WAL", "OFF"];

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sqlite: SqliteConfig,
}

/// Connection settings applied each time a handle is opened.
///
/// Every field is optional. Unset `foreign_keys` means off; unset
/// `journal_mode` and `busy_timeout_ms` keep the engine defaults.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct SqliteConfig {
    pub foreign_keys: Option<bool>,
    pub journal_mode: Option<String>,
    pub busy_timeout_ms: Option<u64>,
}

impl SqliteConfig {
    pub fn busy_timeout(&self) -> Option<Duration> {
        self.busy_timeout_ms.map(Duration::from_millis)
    }

    /// Rejects journal modes SQLite would silently ignore and busy timeouts
    /// the engine cannot represent (milliseconds beyond `i32::MAX`).
    pub fn validate(&self) -> Result<()> {
        if let Some(ms) = self.busy_timeout_ms {
            if ms > i32::MAX as u64 {
                return Err(ExecError::Config(format!(
                    "busy_timeout_ms {} exceeds the maximum of {}",
                    ms,
                    i32::MAX
                )));
            }
        }

        if let Some(mode) = &self.journal_mode {
            if !JOURNAL_MODES.contains(&mode.to_uppercase().as_str()) {
                return Err(ExecError::Config(format!(
                    "unknown journal_mode '{}', expected one of {}",
                    mode,
                    JOURNAL_MODES.join(", ")
                )));
            }
        }
        Ok(())
    }
}

impl FromStr for Config {
    type Err = ExecError;

    fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| ExecError::Config(e.to_string()))?;
        config.sqlite.validate()?;
        Ok(config)
    }
}

/// Loads configuration from a TOML file at the given path.
///
/// # Example
///
/// ```no_run
/// let config = sqlite_exec::config::load_config("sqlite-exec.toml").expect("Failed to load config");
/// println!("{:?}", config);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    content.parse()
}
