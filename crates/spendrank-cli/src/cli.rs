//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// spendrank - See how your spending ranks against everyone else's
#[derive(Parser)]
#[command(name = "spendrank")]
#[command(about = "Income-normalized spend rankings and leaderboards", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Transaction store (CSV). Overrides SPENDRANK_STORE and the config file.
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Config file (defaults to ~/.local/share/spendrank/config.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank a user in one category and timeframe, with leaderboard neighbors
    Rank {
        /// User to rank
        #[arg(long, alias = "user_id")]
        user_id: String,

        /// Category: food_dining, travel, entertainment, personal_care, grocery,
        /// health_fitness, kids_pets, misc, gas_transport, home, shopping
        #[arg(short, long)]
        category: String,

        /// Timeframe: d (daily), w (weekly), m (monthly)
        #[arg(short, long)]
        time: String,

        /// Only rank transactions made in this state (e.g., NY)
        #[arg(short, long)]
        state: Option<String>,

        /// Reference instant (RFC 3339, YYYY-MM-DD or unix seconds)
        #[arg(long, alias = "ref_time")]
        ref_time: Option<String>,
    },

    /// Replay the ranking over past windows
    History {
        /// User to track
        #[arg(long, alias = "user_id")]
        user_id: String,

        /// Category to rank in
        #[arg(short, long)]
        category: String,

        /// Timeframe: d (daily), w (weekly), m (monthly)
        #[arg(short, long)]
        time: String,

        /// Only rank transactions made in this state
        #[arg(short, long)]
        state: Option<String>,

        /// Reference instant of the most recent bucket
        #[arg(long, alias = "ref_time")]
        ref_time: Option<String>,

        /// Number of buckets to replay (defaults to the configured value)
        #[arg(short, long)]
        buckets: Option<usize>,
    },

    /// Show a user's spending by category against their budget
    Breakdown {
        /// User to summarize
        #[arg(long, alias = "user_id")]
        user_id: String,

        /// Timeframe: d (daily), w (weekly), m (monthly)
        #[arg(short, long)]
        time: String,

        /// Reference instant
        #[arg(long, alias = "ref_time")]
        ref_time: Option<String>,
    },

    /// Append a transaction for an existing user
    Append {
        /// User making the transaction (must already have records)
        #[arg(long, alias = "user_id")]
        user_id: String,

        /// Category of the transaction
        #[arg(short, long)]
        category: String,

        /// Amount spent (non-negative)
        #[arg(short, long)]
        amount: f64,

        /// State the transaction was made in
        #[arg(short, long)]
        state: String,

        /// When it happened (defaults to the reference instant)
        #[arg(long)]
        timestamp: Option<String>,
    },

    /// Show store status (records, users, version, fingerprint)
    Status,
}
