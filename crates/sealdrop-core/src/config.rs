//! Runtime configuration read from the environment.
//!
//! Environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `SEALDROP_LEDGER_PATH` | `sealdrop-ledger.json` | File ledger location |
//! | `SEALDROP_MAX_MESSAGE_BYTES` | `32768` | Plaintext size limit |
//! | `LOG_FORMAT` | `text` | `text` or `json` |
//! | `LOG_FILE` | unset | Daily-rotated log file instead of stderr |
//! | `LOG_ANSI` | auto | `true`/`1` or `false`/`0` |
//!
//! `RUST_LOG` is read directly by the subscriber's `EnvFilter`.

use std::path::PathBuf;

use crate::defaults;
use crate::error::{Error, Result};

pub const ENV_LEDGER_PATH: &str = "SEALDROP_LEDGER_PATH";
pub const ENV_MAX_MESSAGE_BYTES: &str = "SEALDROP_MAX_MESSAGE_BYTES";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
pub const ENV_LOG_FILE: &str = "LOG_FILE";
pub const ENV_LOG_ANSI: &str = "LOG_ANSI";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(Error::Config(format!(
                "{} must be 'text' or 'json', got '{}'",
                ENV_LOG_FORMAT, other
            ))),
        }
    }
}

/// Logging settings consumed by the binary's subscriber setup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogConfig {
    pub format: LogFormat,
    pub file: Option<PathBuf>,
    /// `None` means auto-detect.
    pub ansi: Option<bool>,
}

/// Settings for [`crate::service::MessageService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Largest accepted plaintext, in bytes.
    pub max_message_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_message_bytes: defaults::MAX_MESSAGE_BYTES,
        }
    }
}

/// Full runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub ledger_path: PathBuf,
    pub service: ServiceConfig,
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ledger_path: PathBuf::from(defaults::LEDGER_PATH),
            service: ServiceConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Load from process environment variables.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Config::default();

        if let Some(path) = get(ENV_LEDGER_PATH) {
            config.ledger_path = PathBuf::from(path);
        }

        if let Some(raw) = get(ENV_MAX_MESSAGE_BYTES) {
            let limit: usize = raw.trim().parse().map_err(|_| {
                Error::Config(format!(
                    "{} must be a positive integer, got '{}'",
                    ENV_MAX_MESSAGE_BYTES, raw
                ))
            })?;
            if limit == 0 {
                return Err(Error::Config(format!(
                    "{} must be greater than zero",
                    ENV_MAX_MESSAGE_BYTES
                )));
            }
            config.service.max_message_bytes = limit;
        }

        if let Some(raw) = get(ENV_LOG_FORMAT) {
            config.log.format = raw.parse()?;
        }

        config.log.file = get(ENV_LOG_FILE).map(PathBuf::from);
        config.log.ansi = get(ENV_LOG_ANSI).map(|v| v == "true" || v == "1");

        Ok(config)
    }
}
