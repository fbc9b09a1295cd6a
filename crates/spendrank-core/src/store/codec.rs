//! CSV encoding of the transaction table
//!
//! Columns: `user_id,category,timestamp,amount,state,salary,name`, with the
//! timestamp in unix seconds.

use std::io::{Read, Write};

use chrono::DateTime;
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Category, TransactionRecord};

pub const HEADER: [&str; 7] = [
    "user_id",
    "category",
    "timestamp",
    "amount",
    "state",
    "salary",
    "name",
];

/// Row as it appears in the file, before validation
#[derive(Debug, Serialize, Deserialize)]
struct StoreRow {
    user_id: String,
    category: String,
    timestamp: i64,
    amount: f64,
    state: String,
    salary: f64,
    name: String,
}

impl StoreRow {
    fn into_record(self, line: usize) -> Result<TransactionRecord> {
        let category: Category = self
            .category
            .parse()
            .map_err(|_| Error::InvalidData(format!("line {}: unknown category '{}'", line, self.category)))?;

        let timestamp = DateTime::from_timestamp(self.timestamp, 0).ok_or_else(|| {
            Error::InvalidData(format!("line {}: timestamp out of range: {}", line, self.timestamp))
        })?;

        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(Error::InvalidData(format!(
                "line {}: amount must be non-negative, got {}",
                line, self.amount
            )));
        }

        if !self.salary.is_finite() || self.salary <= 0.0 {
            return Err(Error::InvalidData(format!(
                "line {}: salary must be positive, got {}",
                line, self.salary
            )));
        }

        if self.user_id.trim().is_empty() {
            return Err(Error::InvalidData(format!("line {}: missing user_id", line)));
        }

        Ok(TransactionRecord {
            user_id: self.user_id,
            category,
            timestamp,
            amount: self.amount,
            state: self.state,
            salary: self.salary,
            name: self.name,
        })
    }

    fn from_record(record: &TransactionRecord) -> Self {
        Self {
            user_id: record.user_id.clone(),
            category: record.category.as_str().to_string(),
            timestamp: record.timestamp.timestamp(),
            amount: record.amount,
            state: record.state.clone(),
            salary: record.salary,
            name: record.name.clone(),
        }
    }
}

/// Parse a whole store table
///
/// Fails on the first invalid row; a partially read table is never returned.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<TransactionRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in HEADER {
        if !headers.iter().any(|h| h == column) {
            return Err(Error::InvalidData(format!(
                "store is missing the '{}' column",
                column
            )));
        }
    }

    let mut records = Vec::new();
    for (idx, result) in rdr.deserialize::<StoreRow>().enumerate() {
        // Header is line 1
        let line = idx + 2;
        let row = result?;
        records.push(row.into_record(line)?);
    }

    debug!(rows = records.len(), "Parsed transaction store");
    Ok(records)
}

/// Write a whole store table, header included even when empty
pub fn write_records<W: Write>(writer: W, records: &[TransactionRecord]) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(HEADER)?;
    for record in records {
        wtr.serialize(StoreRow::from_record(record))?;
    }
    wtr.flush()?;
    Ok(())
}
