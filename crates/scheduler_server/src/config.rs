//! Server configuration from the process environment.
//!
//! # Invariants
//! - Blank variables count as unset.
//! - The log directory is absolute before logging starts.

use scheduler_core::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "SCHEDULER_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "SCHEDULER_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "SCHEDULER_LOG_DIR";
pub const ENV_BIND: &str = "SCHEDULER_BIND";

const DEFAULT_DB_FILE_NAME: &str = "scheduler.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "scheduler-logs";
const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
    pub bind_addr: SocketAddr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBindAddr { value: String, reason: String },
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBindAddr { value, reason } => {
                write!(f, "{ENV_BIND}=`{value}` is not a socket address: {reason}")
            }
            Self::RelativeLogDir(dir) => {
                write!(f, "{ENV_LOG_DIR}=`{}` must be an absolute path", dir.display())
            }
        }
    }
}

impl Error for ConfigError {}

impl AppConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let db_path = value(ENV_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

        let log_level = value(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string());

        let log_dir = value(ENV_LOG_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME));
        if !log_dir.is_absolute() {
            return Err(ConfigError::RelativeLogDir(log_dir));
        }

        let bind_raw = value(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|err| ConfigError::InvalidBindAddr {
                value: bind_raw.clone(),
                reason: err.to_string(),
            })?;

        Ok(Self {
            db_path,
            log_level,
            log_dir,
            bind_addr,
        })
    }
}
