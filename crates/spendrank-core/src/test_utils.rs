//! Test utilities for spendrank-core
//!
//! Record fixtures and scratch stores shared by unit tests here and by the
//! CLI's command tests.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{Category, TransactionRecord};
use crate::store::write_records;

/// Midnight UTC on the given day
pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|| panic!("invalid test date {year}-{month}-{day}"))
}

/// Builder for a single transaction row
///
/// Defaults: grocery, state NY, 2019-02-10, name derived from the user id.
pub struct RecordBuilder {
    record: TransactionRecord,
}

impl RecordBuilder {
    pub fn new(user_id: &str, salary: f64) -> Self {
        Self {
            record: TransactionRecord {
                user_id: user_id.to_string(),
                category: Category::Grocery,
                timestamp: at(2019, 2, 10),
                amount: 0.0,
                state: "NY".to_string(),
                salary,
                name: format!("User {}", user_id),
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.record.name = name.to_string();
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.record.category = category;
        self
    }

    pub fn state(mut self, state: &str) -> Self {
        self.record.state = state.to_string();
        self
    }

    pub fn on(mut self, timestamp: DateTime<Utc>) -> Self {
        self.record.timestamp = timestamp;
        self
    }

    /// Finish the row with its amount
    pub fn spend(mut self, amount: f64) -> TransactionRecord {
        self.record.amount = amount;
        self.record
    }
}

/// Write `records` as `store.csv` under `dir` and return its path
pub fn write_store(dir: &Path, records: &[TransactionRecord]) -> PathBuf {
    let path = dir.join("store.csv");
    let file = File::create(&path).expect("create scratch store");
    write_records(file, records).expect("write scratch store");
    path
}

/// Two-user grocery market: A earns 120k, B 60k, each spends 1 000 in
/// February 2019
pub fn two_user_market() -> Vec<TransactionRecord> {
    vec![
        RecordBuilder::new("A", 120_000.0)
            .name("Alice")
            .on(at(2019, 2, 1))
            .spend(1_000.0),
        RecordBuilder::new("B", 60_000.0)
            .name("Bob")
            .on(at(2019, 2, 10))
            .spend(1_000.0),
    ]
}
