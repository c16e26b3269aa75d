//! redb-based offline queue for pending report submissions
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `pending_reports` | insertion sequence (u64) | `SubmissionRecord` | FIFO queue |
//! | `queue_meta` | `"seq"` | u64 | Next insertion sequence |
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate`: once `commit()` returns the
//! data is on disk, and copy-on-write with an atomic pointer swap keeps the
//! file consistent across power loss. Items enqueued before a process
//! restart are returned by `read_all()` after reopening, in insertion order.
//!
//! # Contract
//!
//! A drain pass works on a keyed [`snapshot`] and finishes by [`remove`]-ing
//! exactly the sequence keys it delivered (or dropped), in one transaction.
//! Failed records are never touched, so they keep their keys and their
//! order, and a record enqueued while a pass is running sits at a higher
//! sequence and survives untouched. The single-flight guard around the
//! pass lives in the sync engine, not here.
//!
//! [`snapshot`]: OfflineQueue::snapshot
//! [`remove`]: OfflineQueue::remove

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
};
use shared::AppError;
use shared::models::SubmissionRecord;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Queue table: key = insertion sequence, value = JSON-serialized SubmissionRecord
const PENDING_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("pending_reports");

/// Meta table: key = "seq", value = next insertion sequence
const META_TABLE: TableDefinition<&str, u64> = TableDefinition::new("queue_meta");

const SEQ_KEY: &str = "seq";

/// Queue storage errors
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type QueueResult<T> = Result<T, QueueError>;

impl From<QueueError> for AppError {
    fn from(e: QueueError) -> Self {
        AppError::Storage(e.to_string())
    }
}

/// Durable FIFO queue of submission records, backed by redb.
#[derive(Clone)]
pub struct OfflineQueue {
    db: Arc<Database>,
}

impl OfflineQueue {
    /// Open or create the queue database at the given path.
    pub fn open(path: impl AsRef<Path>) -> QueueResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory queue (for testing).
    #[cfg(test)]
    pub fn open_in_memory() -> QueueResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> QueueResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PENDING_TABLE)?;
            let mut meta = write_txn.open_table(META_TABLE)?;
            if meta.get(SEQ_KEY)?.is_none() {
                meta.insert(SEQ_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Append a record to the queue.
    ///
    /// Fails only on a storage-layer I/O error, which is surfaced to the
    /// caller and never retried here.
    pub fn enqueue(&self, record: &SubmissionRecord) -> QueueResult<()> {
        let value = serde_json::to_vec(record)?;
        let txn = self.db.begin_write()?;
        {
            let mut meta = txn.open_table(META_TABLE)?;
            let seq = meta.get(SEQ_KEY)?.map(|g| g.value()).unwrap_or(0);
            meta.insert(SEQ_KEY, seq + 1)?;
            drop(meta);

            let mut table = txn.open_table(PENDING_TABLE)?;
            table.insert(seq, value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Read the full ordered sequence of queued records (insertion order).
    pub fn read_all(&self) -> QueueResult<Vec<SubmissionRecord>> {
        Ok(self.snapshot()?.into_iter().map(|(_, r)| r).collect())
    }

    /// Read the queue with its sequence keys, in insertion order.
    pub fn snapshot(&self) -> QueueResult<Vec<(u64, SubmissionRecord)>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PENDING_TABLE)?;

        let mut records = Vec::new();
        for result in table.iter()? {
            let (key, value) = result?;
            let record: SubmissionRecord = serde_json::from_slice(value.value())?;
            records.push((key.value(), record));
        }
        Ok(records)
    }

    /// Delete the records under the given sequence keys, in one transaction.
    ///
    /// The sync engine calls this with exactly the keys a drain pass
    /// delivered or dropped. Records under any other key, including ones
    /// enqueued while the pass was running, are untouched.
    pub fn remove(&self, keys: &[u64]) -> QueueResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(PENDING_TABLE)?;
            for key in keys {
                table.remove(key)?;
            }
        }
        txn.commit()?;
        Ok(())
    }

    /// Number of queued records.
    pub fn len(&self) -> QueueResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PENDING_TABLE)?;
        Ok(table.len()?)
    }

    pub fn is_empty(&self) -> QueueResult<bool> {
        Ok(self.len()? == 0)
    }
}
