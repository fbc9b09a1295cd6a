//! Rank and history command implementations

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use spendrank_core::{Category, DisplayEntry, Ledger, RawPoint, Timeframe};
use std::collections::BTreeMap;
use tracing::debug;

use super::require_user;

/// Output of `spendrank rank`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankReport {
    pub user_spent_ratio: f64,
    pub user_rank: Option<u32>,
    pub num_users: usize,
    pub top_users: Vec<String>,
    pub top_spent_ratios: Vec<f64>,
    pub display_entries: Vec<DisplayEntry>,
    pub top_percent: Option<f64>,
    pub ref_time: DateTime<Utc>,
}

/// Output of `spendrank history`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryReport {
    pub user_id: String,
    pub category: Category,
    pub timeframe: Timeframe,
    pub rank_series: BTreeMap<DateTime<Utc>, u32>,
    pub ratio_series: BTreeMap<DateTime<Utc>, f64>,
    pub raw_series: BTreeMap<DateTime<Utc>, Vec<RawPoint>>,
    pub ref_time: DateTime<Utc>,
}

pub fn cmd_rank(
    ledger: &Ledger,
    user_id: &str,
    category: &str,
    time: &str,
    state: Option<&str>,
    reference: DateTime<Utc>,
) -> Result<RankReport> {
    let category: Category = category.parse()?;
    let timeframe: Timeframe = time.parse()?;

    let snapshot = ledger.snapshot();
    require_user(&snapshot, user_id)?;

    let outcome = snapshot.rank(user_id, category, timeframe, reference, state)?;
    debug!(
        user_id,
        rank = ?outcome.user_rank,
        neighbors = outcome.neighbors.len(),
        "Rank query complete"
    );

    Ok(RankReport {
        user_spent_ratio: outcome.user_ratio,
        user_rank: outcome.user_rank,
        num_users: outcome.user_count_nonzero,
        top_users: outcome.neighbors.iter().map(|n| n.user_id.clone()).collect(),
        top_spent_ratios: outcome.neighbors.iter().map(|n| n.spent_ratio).collect(),
        display_entries: outcome.display_entries(),
        top_percent: outcome.top_percent(),
        ref_time: reference,
    })
}

pub fn cmd_history(
    ledger: &Ledger,
    user_id: &str,
    category: &str,
    time: &str,
    state: Option<&str>,
    reference: DateTime<Utc>,
    buckets: usize,
) -> Result<HistoryReport> {
    let category: Category = category.parse()?;
    let timeframe: Timeframe = time.parse()?;

    let snapshot = ledger.snapshot();
    require_user(&snapshot, user_id)?;

    let history = snapshot.history(user_id, category, timeframe, reference, buckets, state)?;

    Ok(HistoryReport {
        user_id: user_id.to_string(),
        category,
        timeframe,
        rank_series: history.rank_series,
        ratio_series: history.ratio_series,
        raw_series: history.raw_series,
        ref_time: reference,
    })
}
