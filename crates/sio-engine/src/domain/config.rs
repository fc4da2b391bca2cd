//! Engine configuration types.
//!
//! [`EngineConfig`] carries every runtime setting of the engine.  It can be
//! built from defaults, from CLI arguments, or from a TOML file:
//!
//! ```toml
//! close_timeout_secs = 25
//! heartbeat_interval_secs = 15
//! heartbeat_timeout_secs = 10
//! poll_timeout_secs = 20
//! write_timeout_secs = 5
//! transports = ["websocket"]
//! ```
//!
//! Every field is optional in the file; a missing field takes its default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// All runtime configuration for the engine.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use sio_engine::domain::EngineConfig;
///
/// let cfg = EngineConfig::default();
/// assert_eq!(cfg.heartbeat_interval, Duration::from_secs(15));
/// assert_eq!(cfg.transports, vec!["websocket".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// How long a server keeps a session after its transport closes.
    pub close_timeout: Duration,

    /// How often a heartbeat is sent on an idle connection.
    pub heartbeat_interval: Duration,

    /// Grace period after a missed heartbeat before the peer is considered
    /// dead.  Added to `heartbeat_interval` to form the read deadline.
    pub heartbeat_timeout: Duration,

    /// Maximum hold time of a polling request.  Only meaningful for polling
    /// transports; kept so one config file can drive every transport.
    pub poll_timeout: Duration,

    /// Bound on each physical write, including the wait for the write lock.
    pub write_timeout: Duration,

    /// Names of the enabled transports, in order of preference.  `dial`
    /// only uses a transport that is both enabled here and offered by the
    /// server; unknown names are ignored.
    pub transports: Vec<String>,
}

impl Default for EngineConfig {
    /// | Field              | Default         |
    /// |--------------------|-----------------|
    /// | close_timeout      | 25 seconds      |
    /// | heartbeat_interval | 15 seconds      |
    /// | heartbeat_timeout  | 10 seconds      |
    /// | poll_timeout       | 20 seconds      |
    /// | write_timeout      | 5 seconds       |
    /// | transports         | `["websocket"]` |
    fn default() -> Self {
        Self {
            close_timeout: Duration::from_secs(default_close_timeout()),
            heartbeat_interval: Duration::from_secs(default_heartbeat_interval()),
            heartbeat_timeout: Duration::from_secs(default_heartbeat_timeout()),
            poll_timeout: Duration::from_secs(default_poll_timeout()),
            write_timeout: Duration::from_secs(default_write_timeout()),
            transports: default_transports(),
        }
    }
}

impl EngineConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid TOML or mistyped fields.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text)?;
        Ok(file.into())
    }

    /// Reads and parses the TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if its content is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Read deadline for one `receive` call: a peer that sends nothing for a
    /// whole heartbeat period plus the grace timeout is gone.
    pub fn read_timeout(&self) -> Duration {
        self.heartbeat_interval + self.heartbeat_timeout
    }
}

// ── On-disk schema ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default = "default_close_timeout")]
    close_timeout_secs: u64,
    #[serde(default = "default_heartbeat_interval")]
    heartbeat_interval_secs: u64,
    #[serde(default = "default_heartbeat_timeout")]
    heartbeat_timeout_secs: u64,
    #[serde(default = "default_poll_timeout")]
    poll_timeout_secs: u64,
    #[serde(default = "default_write_timeout")]
    write_timeout_secs: u64,
    #[serde(default = "default_transports")]
    transports: Vec<String>,
}

impl From<ConfigFile> for EngineConfig {
    fn from(file: ConfigFile) -> Self {
        Self {
            close_timeout: Duration::from_secs(file.close_timeout_secs),
            heartbeat_interval: Duration::from_secs(file.heartbeat_interval_secs),
            heartbeat_timeout: Duration::from_secs(file.heartbeat_timeout_secs),
            poll_timeout: Duration::from_secs(file.poll_timeout_secs),
            write_timeout: Duration::from_secs(file.write_timeout_secs),
            transports: file.transports,
        }
    }
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_close_timeout() -> u64 {
    25
}
fn default_heartbeat_interval() -> u64 {
    15
}
fn default_heartbeat_timeout() -> u64 {
    10
}
fn default_poll_timeout() -> u64 {
    20
}
fn default_write_timeout() -> u64 {
    5
}
fn default_transports() -> Vec<String> {
    vec!["websocket".to_string()]
}

// ── Tests ─────────────────────────────────────────────────────────────────────
