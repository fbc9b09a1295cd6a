//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (config, opening the store, JSON output)
//! - `rank` - Ranking and history commands
//! - `ledger` - Store-level commands (append, breakdown, status)
//!
//! Each command returns a serializable report; `main` prints it as JSON.

pub mod core;
pub mod ledger;
pub mod rank;

// Re-export command functions for main.rs
pub use core::*;
pub use ledger::*;
pub use rank::*;
