//! Core command utilities shared by every subcommand
//!
//! This module contains:
//! - `load_config` - Resolve config file, environment and `--store`
//! - `open_ledger` - Open the configured transaction store
//! - `resolve_reference` - Pick the reference instant for a query
//! - `require_user` - Reject users the store has never seen
//! - `print_json` - Emit one JSON object on stdout

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use spendrank_core::{config::parse_instant, Config, Error, Ledger, Snapshot};

/// Resolve configuration, letting `--store` win over every other layer
pub fn load_config(store: Option<&Path>, config_path: Option<&Path>) -> Result<Config> {
    let mut config = Config::load(config_path).context("Failed to load configuration")?;
    if let Some(store) = store {
        config.store_path = store.to_path_buf();
    }
    Ok(config)
}

/// Open the configured store; a missing file is an error
pub fn open_ledger(config: &Config) -> Result<Ledger> {
    Ledger::open(&config.store_path).with_context(|| {
        format!(
            "Failed to open transaction store {}",
            config.store_path.display()
        )
    })
}

/// Reference instant from `--ref-time`, else the configured one
pub fn resolve_reference(config: &Config, ref_time: Option<&str>) -> Result<DateTime<Utc>> {
    match ref_time {
        Some(s) => parse_instant(s).context("Invalid --ref-time"),
        None => Ok(config.reference_time),
    }
}

/// Top-level lookups treat a user with no records at all as an error
pub fn require_user(snapshot: &Snapshot, user_id: &str) -> Result<()> {
    if snapshot.contains_user(user_id) {
        Ok(())
    } else {
        Err(Error::UnknownUser(user_id.to_string()).into())
    }
}

/// Write a single JSON object to stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string(value).context("Failed to serialize output")?;
    println!("{}", out);
    Ok(())
}
