//! Error types for spendrank

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid timeframe: {0} (valid: d, w, m)")]
    InvalidTimeframe(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to persist store: {0}")]
    Persist(String),
}

pub type Result<T> = std::result::Result<T, Error>;
