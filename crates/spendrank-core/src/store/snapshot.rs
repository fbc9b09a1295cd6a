//! Immutable, indexed view of the transaction table
//!
//! A snapshot is built once per store version and shared between readers.
//! Records keep their store order; a per-category index ordered by timestamp
//! lets window queries skip everything outside the interval.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::models::{Category, TransactionRecord, UserProfile};

#[derive(Debug)]
pub struct Snapshot {
    version: u64,
    records: Vec<TransactionRecord>,
    /// Record positions per category, ordered by (timestamp, position)
    by_category: HashMap<Category, Vec<usize>>,
    /// Position of each user's first record
    first_seen: HashMap<String, usize>,
    fingerprint: String,
}

impl Snapshot {
    pub fn new(version: u64, records: Vec<TransactionRecord>) -> Self {
        let mut by_category: HashMap<Category, Vec<usize>> = HashMap::new();
        let mut first_seen = HashMap::new();
        let mut hasher = Sha256::new();

        for (pos, record) in records.iter().enumerate() {
            by_category.entry(record.category).or_default().push(pos);
            first_seen.entry(record.user_id.clone()).or_insert(pos);
            hash_record(&mut hasher, record);
        }

        for positions in by_category.values_mut() {
            positions.sort_by_key(|&pos| (records[pos].timestamp, pos));
        }

        Self {
            version,
            records,
            by_category,
            first_seen,
            fingerprint: hex::encode(hasher.finalize()),
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// SHA-256 over every row, hex encoded
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn user_count(&self) -> usize {
        self.first_seen.len()
    }

    pub fn contains_user(&self, user_id: &str) -> bool {
        self.first_seen.contains_key(user_id)
    }

    /// Look up a user's name and salary from their first record
    pub fn user(&self, user_id: &str) -> Result<UserProfile> {
        let pos = self
            .first_seen
            .get(user_id)
            .ok_or_else(|| Error::UnknownUser(user_id.to_string()))?;
        let record = &self.records[*pos];
        Ok(UserProfile {
            user_id: record.user_id.clone(),
            name: record.name.clone(),
            salary: record.salary,
        })
    }

    /// Records of one category with `start <= timestamp <= end`, in store order
    pub fn category_between(
        &self,
        category: Category,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<&TransactionRecord> {
        let Some(positions) = self.by_category.get(&category) else {
            return Vec::new();
        };

        let lo = positions.partition_point(|&pos| self.records[pos].timestamp < start);
        let hi = positions.partition_point(|&pos| self.records[pos].timestamp <= end);
        if lo >= hi {
            return Vec::new();
        }

        let mut hits: Vec<usize> = positions[lo..hi].to_vec();
        hits.sort_unstable();
        hits.into_iter().map(|pos| &self.records[pos]).collect()
    }

    /// Records of any category with `start <= timestamp <= end`, in store order
    pub fn all_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<&TransactionRecord> {
        self.records
            .iter()
            .filter(|r| r.timestamp >= start && r.timestamp <= end)
            .collect()
    }

    /// Next version of this snapshot with one more record
    pub(crate) fn with_appended(&self, record: TransactionRecord) -> Self {
        let mut records = self.records.clone();
        records.push(record);
        Self::new(self.version + 1, records)
    }
}

fn hash_record(hasher: &mut Sha256, record: &TransactionRecord) {
    hasher.update(record.user_id.as_bytes());
    hasher.update(record.category.as_str().as_bytes());
    hasher.update(record.timestamp.timestamp().to_be_bytes());
    hasher.update(record.amount.to_be_bytes());
    hasher.update(record.state.as_bytes());
    hasher.update(record.salary.to_be_bytes());
    hasher.update(record.name.as_bytes());
    hasher.update([b'\n']);
}
