//! Store-level command implementations (append, breakdown, status)

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use spendrank_core::{
    config::parse_instant, Category, Ledger, NewTransaction, Timeframe, TransactionRecord,
};

/// Output of `spendrank append`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendReport {
    pub appended: TransactionRecord,
    pub version: u64,
    pub records: usize,
}

/// Output of `spendrank breakdown`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownReport {
    pub user_id: String,
    pub by_category: BTreeMap<Category, f64>,
    pub total: f64,
    pub budget: f64,
    pub budget_delta: f64,
    pub ref_time: DateTime<Utc>,
}

/// Output of `spendrank status`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub path: String,
    pub records: usize,
    pub users: usize,
    pub version: u64,
    pub fingerprint: String,
}

pub fn cmd_append(
    ledger: &Ledger,
    user_id: &str,
    category: &str,
    amount: f64,
    state: &str,
    timestamp: Option<&str>,
    reference: DateTime<Utc>,
) -> Result<AppendReport> {
    let category: Category = category.parse()?;
    let timestamp = match timestamp {
        Some(s) => parse_instant(s).context("Invalid --timestamp")?,
        None => reference,
    };

    let appended = ledger
        .append(NewTransaction {
            user_id: user_id.to_string(),
            category,
            timestamp,
            amount,
            state: state.to_string(),
        })
        .with_context(|| format!("Failed to append transaction for {}", user_id))?;

    let snapshot = ledger.snapshot();
    Ok(AppendReport {
        appended,
        version: snapshot.version(),
        records: snapshot.len(),
    })
}

pub fn cmd_breakdown(
    ledger: &Ledger,
    user_id: &str,
    time: &str,
    reference: DateTime<Utc>,
) -> Result<BreakdownReport> {
    let timeframe: Timeframe = time.parse()?;
    let breakdown = ledger.snapshot().breakdown(user_id, timeframe, reference)?;

    Ok(BreakdownReport {
        user_id: user_id.to_string(),
        by_category: breakdown.by_category,
        total: breakdown.total,
        budget: breakdown.budget,
        budget_delta: breakdown.budget_delta,
        ref_time: reference,
    })
}

pub fn cmd_status(ledger: &Ledger) -> Result<StatusReport> {
    let snapshot = ledger.snapshot();
    Ok(StatusReport {
        path: ledger
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ":memory:".to_string()),
        records: snapshot.len(),
        users: snapshot.user_count(),
        version: snapshot.version(),
        fingerprint: snapshot.fingerprint().to_string(),
    })
}
