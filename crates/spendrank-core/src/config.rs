//! Runtime configuration
//!
//! ## Configuration Resolution
//!
//! Settings are layered, later layers winning:
//! 1. Built-in defaults
//! 2. TOML file (explicit path, else ~/.local/share/spendrank/config.toml if present)
//! 3. Environment (`SPENDRANK_STORE`, `SPENDRANK_REF_TIME`)
//!
//! Command-line flags are applied on top by the CLI.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::history::DEFAULT_BUCKETS;

/// Environment variable overriding the store path
pub const STORE_ENV: &str = "SPENDRANK_STORE";

/// Environment variable overriding the reference instant
pub const REF_TIME_ENV: &str = "SPENDRANK_REF_TIME";

/// Store file used when nothing else is configured
pub const DEFAULT_STORE: &str = "credit_card_transaction.csv";

/// Demo reference instant, 2019-02-15T00:00:00Z
pub const DEFAULT_REFERENCE_UNIX: i64 = 1_550_188_800;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub store_path: PathBuf,
    pub reference_time: DateTime<Utc>,
    pub history_buckets: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE),
            reference_time: DateTime::from_timestamp(DEFAULT_REFERENCE_UNIX, 0).unwrap_or_default(),
            history_buckets: DEFAULT_BUCKETS,
        }
    }
}

/// Default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("spendrank").join("config.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    store_path: Option<PathBuf>,
    reference_time: Option<String>,
    history_buckets: Option<usize>,
}

impl Config {
    /// Resolve defaults, config file and environment
    ///
    /// An explicit `override_path` must exist; the default location is
    /// optional.
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let content = match override_path {
            Some(path) => Some(fs::read_to_string(path).map_err(|e| {
                Error::InvalidData(format!("Failed to read config {}: {}", path.display(), e))
            })?),
            None => match default_config_path() {
                Some(path) if path.exists() => Some(fs::read_to_string(&path).map_err(|e| {
                    Error::InvalidData(format!("Failed to read config {}: {}", path.display(), e))
                })?),
                _ => None,
            },
        };

        let mut config = match content {
            Some(text) => Self::from_toml(&text)?,
            None => Self::default(),
        };
        config.apply_env(
            std::env::var(STORE_ENV).ok().as_deref(),
            std::env::var(REF_TIME_ENV).ok().as_deref(),
        )?;

        debug!(?config, "Resolved configuration");
        Ok(config)
    }

    /// Parse config from TOML content on top of the defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::InvalidData(format!("Invalid config TOML: {}", e)))?;

        let mut config = Self::default();
        if let Some(path) = raw.store_path {
            config.store_path = path;
        }
        if let Some(reference) = raw.reference_time {
            config.reference_time = parse_instant(&reference)?;
        }
        if let Some(buckets) = raw.history_buckets {
            config.history_buckets = buckets;
        }
        Ok(config)
    }

    /// Apply environment overrides (passed in so tests need not touch the
    /// process environment)
    pub fn apply_env(&mut self, store: Option<&str>, reference: Option<&str>) -> Result<()> {
        if let Some(store) = store.filter(|s| !s.trim().is_empty()) {
            self.store_path = PathBuf::from(store);
        }
        if let Some(reference) = reference.filter(|s| !s.trim().is_empty()) {
            self.reference_time = parse_instant(reference)?;
        }
        Ok(())
    }
}

/// Parse an instant given as RFC 3339, `YYYY-MM-DD` (midnight UTC) or unix seconds
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    if let Ok(secs) = s.parse::<i64>() {
        if let Some(dt) = DateTime::from_timestamp(secs, 0) {
            return Ok(dt);
        }
    }

    Err(Error::InvalidData(format!("Unable to parse instant: {}", s)))
}
