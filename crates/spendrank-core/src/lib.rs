//! spendrank Core Library
//!
//! Spend-ranking and leaderboard engine for the spendrank finance demo:
//! - Append-only CSV transaction store with snapshot reads
//! - Window filtering by category, state and timeframe
//! - Income-normalized spend ratios
//! - Tie-aware ranking and leaderboard neighborhoods
//! - Historical replay of rankings over past windows
//! - Per-category spending breakdown against the period budget

pub mod breakdown;
pub mod config;
pub mod error;
pub mod history;
pub mod leaderboard;
pub mod models;
pub mod normalize;
pub mod ranking;
pub mod store;
pub mod window;

/// Test utilities including record fixtures and scratch stores
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::Config;
pub use error::{Error, Result};
pub use models::{
    Category, DisplayEntry, History, NewTransaction, Neighbor, RankOutcome, RankedUser, RawPoint,
    Role, SpendingBreakdown, Timeframe, TransactionRecord, UserProfile,
};
pub use store::{Ledger, Snapshot};
pub use window::{Window, WindowFilter};
