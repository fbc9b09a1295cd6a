//! spendrank CLI - Income-normalized spend rankings
//!
//! Usage:
//!   spendrank rank --user-id U6 -c grocery -t m       Rank a user with leaderboard neighbors
//!   spendrank history --user-id U6 -c grocery -t m    Replay the rank over past windows
//!   spendrank breakdown --user-id U6 -t m             Per-category spend against budget
//!   spendrank append --user-id U6 -c travel -a 42 -s NY
//!   spendrank status                                  Store summary

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    // stdout carries the JSON result, so logs go to stderr
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();

    let config = commands::load_config(cli.store.as_deref(), cli.config.as_deref())?;
    let ledger = commands::open_ledger(&config)?;

    match cli.command {
        Commands::Rank {
            user_id,
            category,
            time,
            state,
            ref_time,
        } => {
            let reference = commands::resolve_reference(&config, ref_time.as_deref())?;
            let report = commands::cmd_rank(
                &ledger,
                &user_id,
                &category,
                &time,
                state.as_deref(),
                reference,
            )?;
            commands::print_json(&report)
        }
        Commands::History {
            user_id,
            category,
            time,
            state,
            ref_time,
            buckets,
        } => {
            let reference = commands::resolve_reference(&config, ref_time.as_deref())?;
            let report = commands::cmd_history(
                &ledger,
                &user_id,
                &category,
                &time,
                state.as_deref(),
                reference,
                buckets.unwrap_or(config.history_buckets),
            )?;
            commands::print_json(&report)
        }
        Commands::Breakdown {
            user_id,
            time,
            ref_time,
        } => {
            let reference = commands::resolve_reference(&config, ref_time.as_deref())?;
            let report = commands::cmd_breakdown(&ledger, &user_id, &time, reference)?;
            commands::print_json(&report)
        }
        Commands::Append {
            user_id,
            category,
            amount,
            state,
            timestamp,
        } => {
            let report = commands::cmd_append(
                &ledger,
                &user_id,
                &category,
                amount,
                &state,
                timestamp.as_deref(),
                config.reference_time,
            )?;
            commands::print_json(&report)
        }
        Commands::Status => {
            let report = commands::cmd_status(&ledger)?;
            commands::print_json(&report)
        }
    }
}
