//! Transaction store with snapshot reads and a single writer
//!
//! This module is organized by concern:
//! - `codec` - CSV encoding of the transaction table
//! - `snapshot` - Immutable indexed view shared by readers
//!
//! Readers take an `Arc<Snapshot>` and run a whole query against it. Appends
//! are serialized by a writer lock; the next snapshot is persisted to disk
//! before it replaces the current one, so a failed write leaves both the file
//! and the in-memory view untouched.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use chrono::SubsecRound;
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::{NewTransaction, TransactionRecord};

mod codec;
mod snapshot;

pub use codec::{read_records, write_records, HEADER};
pub use snapshot::Snapshot;

/// Append-only transaction store backed by a CSV file
pub struct Ledger {
    /// Backing file; `None` for in-memory ledgers
    path: Option<PathBuf>,
    current: RwLock<Arc<Snapshot>>,
    writer: Mutex<()>,
}

impl Ledger {
    /// Open an existing store file
    ///
    /// A missing or unreadable file is an error, never an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = load_file(&path)?;
        info!(path = %path.display(), records = records.len(), "Opened transaction store");
        Ok(Self::with_records(Some(path), records))
    }

    /// Open a store file, initialising it with just a header if it is missing
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            persist(path, &[])?;
            info!(path = %path.display(), "Created empty transaction store");
        }
        Self::open(path)
    }

    /// Ledger that lives only in memory (appends are not persisted)
    pub fn in_memory(records: Vec<TransactionRecord>) -> Self {
        Self::with_records(None, records)
    }

    fn with_records(path: Option<PathBuf>, records: Vec<TransactionRecord>) -> Self {
        Self {
            path,
            current: RwLock::new(Arc::new(Snapshot::new(1, records))),
            writer: Mutex::new(()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Latest committed snapshot
    pub fn snapshot(&self) -> Arc<Snapshot> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Re-read the backing file and publish it as a new snapshot
    ///
    /// For stores shared with other processes. In-memory ledgers return the
    /// current snapshot unchanged.
    pub fn reload(&self) -> Result<Arc<Snapshot>> {
        let _writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        let Some(path) = &self.path else {
            return Ok(self.snapshot());
        };

        let records = load_file(path)?;
        let next = Arc::new(Snapshot::new(self.snapshot().version() + 1, records));
        info!(
            version = next.version(),
            records = next.len(),
            "Reloaded transaction store"
        );
        self.publish(Arc::clone(&next));
        Ok(next)
    }

    /// Append one transaction for a user who already has records
    ///
    /// Salary and display name are copied from the user's first record. A user
    /// with no records cannot be appended for, since there is no other source
    /// for their salary. The timestamp is truncated to whole seconds, the
    /// precision of the store file.
    pub fn append(&self, tx: NewTransaction) -> Result<TransactionRecord> {
        let _writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        let current = self.snapshot();

        let profile = current.user(&tx.user_id)?;

        if !tx.amount.is_finite() || tx.amount < 0.0 {
            return Err(Error::InvalidData(format!(
                "amount must be non-negative, got {}",
                tx.amount
            )));
        }

        let record = TransactionRecord {
            user_id: profile.user_id,
            category: tx.category,
            timestamp: tx.timestamp.trunc_subsecs(0),
            amount: tx.amount,
            state: tx.state,
            salary: profile.salary,
            name: profile.name,
        };

        let next = current.with_appended(record.clone());
        if let Some(path) = &self.path {
            persist(path, next.records())?;
        }

        info!(
            user_id = %record.user_id,
            category = %record.category,
            amount = record.amount,
            version = next.version(),
            "Appended transaction"
        );
        self.publish(Arc::new(next));
        Ok(record)
    }

    fn publish(&self, next: Arc<Snapshot>) {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = next;
    }
}

fn load_file(path: &Path) -> Result<Vec<TransactionRecord>> {
    let file = File::open(path)?;
    read_records(BufReader::new(file))
}

/// Rewrite the whole table through a temp file in the same directory
fn persist(path: &Path, records: &[TransactionRecord]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let tmp = NamedTempFile::new_in(&dir)?;
    // Temp files are created owner-only; keep the store's existing mode
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    {
        let mut out = BufWriter::new(tmp.as_file());
        write_records(&mut out, records)?;
        out.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .map_err(|e| Error::Persist(format!("{}: {}", path.display(), e)))?;
    Ok(())
}
