use std::path::{Path, PathBuf};

use ipset_runner::{Error, IPSET_CMD, IpSet, Result};
use serde::Deserialize;

/// Configuration of the ipset-runner command line tool
///
/// Loaded from a TOML file; every section falls back to its defaults when
/// missing.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Logger configuration
    #[serde(default)]
    pub log: LoggerConfig,

    /// How the ipset utility is invoked
    #[serde(default)]
    pub ipset: RunnerConfig,

    /// Defaults for sets created from the command line
    #[serde(default)]
    pub set: IpSet,
}

/// Logging configuration parameters
#[derive(Debug, Deserialize)]
pub struct LoggerConfig {
    /// Log level, determining which messages are displayed
    ///
    /// Valid values: "off", "error", "warn", "info", "debug", "trace"
    /// Default is "info".
    #[serde(default = "LoggerConfig::default_log_level")]
    pub level: String,

    /// Prefix each log message with a timestamp, default is false
    #[serde(default)]
    pub timestamp: bool,
}

impl LoggerConfig {
    #[inline]
    fn default_log_level() -> String { "info".to_string() }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LoggerConfig::default_log_level(),
            timestamp: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RunnerConfig {
    /// ipset binary, looked up on PATH unless absolute
    /// Default is "ipset".
    #[serde(default = "RunnerConfig::default_command")]
    pub command: String,

    /// Advisory lock file taken around every operation
    /// Locking is disabled when unset.
    #[serde(default)]
    pub lock_file: Option<PathBuf>,

    /// Seconds to wait for the lock before giving up, default is 2
    #[serde(default = "RunnerConfig::default_lock_timeout")]
    pub lock_timeout: u64,
}

impl RunnerConfig {
    #[inline]
    fn default_command() -> String { IPSET_CMD.to_string() }

    #[inline]
    fn default_lock_timeout() -> u64 { 2 }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            command: RunnerConfig::default_command(),
            lock_file: None,
            lock_timeout: RunnerConfig::default_lock_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(filename: &Path) -> Result<Config> {
        let config_data =
            std::fs::read_to_string(filename).map_err(|source| Error::ConfigRead {
                path: filename.to_path_buf(),
                source,
            })?;
        Self::parse(&config_data)
    }

    pub fn parse(config_data: &str) -> Result<Config> { Ok(toml::from_str(config_data)?) }
}
