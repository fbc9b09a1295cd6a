//! Ranking engine
//!
//! Ranks every user with a positive spend ratio in a window and picks the
//! leaderboard neighborhood around one user.
//!
//! Ranks are descending: the highest spend ratio is rank 1. Ties share the
//! rank of the first member of their group and the next distinct ratio skips
//! by the group size (min-ranking). Within a tie group users are ordered by
//! `user_id` so repeated queries produce identical output.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::Result;
use crate::models::{Category, Neighbor, RankOutcome, RankedUser, Role, Timeframe};
use crate::normalize::{normalize, Normalized, UserSpend};
use crate::store::Snapshot;
use crate::window::{Window, WindowFilter};

/// Number of leading entries always shown
pub const TOP_N: usize = 3;

/// Min-rank the users with a positive ratio, best first
pub fn min_rank(spends: &[UserSpend]) -> Vec<RankedUser> {
    let mut ranked: Vec<&UserSpend> = spends.iter().filter(|s| s.spent_ratio > 0.0).collect();
    ranked.sort_by(|a, b| {
        b.spent_ratio
            .partial_cmp(&a.spent_ratio)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });

    let mut out: Vec<RankedUser> = Vec::with_capacity(ranked.len());
    for (pos, spend) in ranked.into_iter().enumerate() {
        let rank = match out.last() {
            Some(prev) if prev.spent_ratio == spend.spent_ratio => prev.rank,
            _ => pos as u32 + 1,
        };
        out.push(RankedUser {
            user_id: spend.user_id.clone(),
            name: spend.name.clone(),
            spent_ratio: spend.spent_ratio,
            rank,
        });
    }
    out
}

fn neighbor(entry: &RankedUser, role: Role) -> Neighbor {
    Neighbor {
        role,
        user_id: entry.user_id.clone(),
        name: entry.name.clone(),
        spent_ratio: entry.spent_ratio,
        rank: entry.rank,
    }
}

fn top_entries(ranked: &[RankedUser]) -> Vec<Neighbor> {
    ranked
        .iter()
        .take(TOP_N)
        .enumerate()
        .map(|(i, entry)| neighbor(entry, Role::Top(i as u8 + 1)))
        .collect()
}

/// Neighborhood of the user at position `pos` in `ranked`
///
/// Rank <= 3: the first three entries, with the user swapped in for the last
/// tie-mate if the tie group runs past position three.
/// Rank > 3: the first three entries, then the closest entry ranked strictly
/// ahead, the user, and the closest entry ranked strictly behind.
pub fn select_neighbors(ranked: &[RankedUser], pos: usize) -> Vec<Neighbor> {
    let user = &ranked[pos];

    if user.rank as usize <= TOP_N {
        let mut picked: Vec<usize> = (0..ranked.len().min(TOP_N)).collect();
        if pos >= TOP_N {
            if let Some(slot) = picked.iter().rposition(|&i| ranked[i].rank == user.rank) {
                picked[slot] = pos;
            }
        }
        return picked
            .into_iter()
            .enumerate()
            .map(|(i, idx)| {
                let role = if idx == pos {
                    Role::User
                } else {
                    Role::Top(i as u8 + 1)
                };
                neighbor(&ranked[idx], role)
            })
            .collect();
    }

    let mut out = top_entries(ranked);

    // Tie group of the user spans [group_start, group_end)
    let group_start = ranked.partition_point(|e| e.rank < user.rank);
    let group_end = ranked.partition_point(|e| e.rank <= user.rank);

    if let Some(before) = group_start.checked_sub(1).map(|i| &ranked[i]) {
        if !out.iter().any(|n| n.user_id == before.user_id) {
            out.push(neighbor(before, Role::Before));
        }
    }
    out.push(neighbor(user, Role::User));
    if let Some(after) = ranked.get(group_end) {
        out.push(neighbor(after, Role::After));
    }
    out
}

impl Snapshot {
    /// Rank `user_id` among everyone who spent in `category` during the
    /// window ending at `reference`
    ///
    /// A user with no spend in the window is reported as absent (ratio 0, no
    /// rank), never as an error. Fails only when the window itself cannot be
    /// resolved.
    pub fn rank(
        &self,
        user_id: &str,
        category: Category,
        timeframe: Timeframe,
        reference: DateTime<Utc>,
        state: Option<&str>,
    ) -> Result<RankOutcome> {
        let records = WindowFilter::new(Window::resolve(timeframe, reference)?)
            .category(Some(category))
            .state(state)
            .apply(self);

        let spends = match normalize(&records, timeframe) {
            Normalized::EmptyMarket => return Ok(RankOutcome::empty_market()),
            Normalized::Market(spends) => spends,
        };

        let ranked = min_rank(&spends);
        let count = ranked.len();

        let Some(pos) = ranked.iter().position(|e| e.user_id == user_id) else {
            debug!(user_id, count, "User absent from ranked window");
            return Ok(RankOutcome {
                market_empty: false,
                user_ratio: 0.0,
                user_rank: None,
                user_count_nonzero: count,
                neighbors: top_entries(&ranked),
            });
        };

        let user = &ranked[pos];
        debug!(user_id, rank = user.rank, count, "Ranked user");
        Ok(RankOutcome {
            market_empty: false,
            user_ratio: user.spent_ratio,
            user_rank: Some(user.rank),
            user_count_nonzero: count,
            neighbors: select_neighbors(&ranked, pos),
        })
    }
}
