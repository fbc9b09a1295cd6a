//! Leaderboard display rows
//!
//! Turns the ranking engine's neighborhood into rows with a display rank.
//! When the user is unranked or in the top three, rows are numbered 1..n.
//! Otherwise each row is numbered from its role: top entries keep their
//! position, and the before/user/after entries sit at `rank - 1`, `rank` and
//! `rank + 1` around the user's rank.

use crate::models::{DisplayEntry, Neighbor, RankOutcome, Role};
use crate::ranking::TOP_N;

pub fn format(neighbors: &[Neighbor], user_rank: Option<u32>) -> Vec<DisplayEntry> {
    match user_rank {
        Some(rank) if rank as usize > TOP_N => neighbors
            .iter()
            .map(|n| DisplayEntry {
                name: n.name.clone(),
                rank: match n.role {
                    Role::Top(pos) => pos as u32,
                    Role::Before => rank - 1,
                    Role::User => rank,
                    Role::After => rank + 1,
                },
                spent_ratio: n.spent_ratio,
            })
            .collect(),
        _ => neighbors
            .iter()
            .enumerate()
            .map(|(i, n)| DisplayEntry {
                name: n.name.clone(),
                rank: i as u32 + 1,
                spent_ratio: n.spent_ratio,
            })
            .collect(),
    }
}

impl RankOutcome {
    /// Display rows for this outcome
    pub fn display_entries(&self) -> Vec<DisplayEntry> {
        format(&self.neighbors, self.user_rank)
    }
}
