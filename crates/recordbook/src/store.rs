//! In-memory record store.
//!
//! Records are kept newest-first: [`RecordStore::append`] inserts at
//! position 0. Positional operations fail with
//! [`Error::IndexOutOfRange`] instead of silently ignoring a bad index;
//! id-based operations are layered on top of them.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::record::{Record, RecordDraft, RecordId};

/// Ordered, memory-resident collection of records.
#[derive(Debug)]
pub struct RecordStore {
    /// Records, newest first.
    records: Vec<Record>,
    /// Next id to hand out.
    next_id: u64,
    /// Timestamp source.
    clock: Box<dyn Clock>,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    /// Create an empty store stamped with wall-clock time.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Create an empty store using `clock` for timestamps.
    #[must_use]
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
            clock: Box::new(clock),
        }
    }

    /// Insert a new record at the front of the store.
    ///
    /// The record is stamped with the current time and given a fresh id.
    pub fn append(&mut self, draft: RecordDraft) -> RecordId {
        let id = RecordId::new(self.next_id);
        self.next_id += 1;

        let record = Record::new(id, draft, self.clock.now());
        debug!(%id, keyword = %record.keyword, "Appending record");
        self.records.insert(0, record);
        id
    }

    /// Replace the fields of the record at `index` and refresh its timestamp.
    ///
    /// The new timestamp is never earlier than the one it replaces.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index` is not in `[0, len)`.
    pub fn update_at(&mut self, index: usize, draft: RecordDraft) -> Result<&Record> {
        let len = self.records.len();
        let now = self.clock.now();
        let record = self
            .records
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;

        record.keyword = draft.keyword;
        record.description = draft.description;
        record.timestamp = now.max(record.timestamp);
        debug!(id = %record.id, index, "Updated record");
        Ok(&*record)
    }

    /// Remove and return the record at `index`.
    ///
    /// Later records shift down by one position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index` is not in `[0, len)`.
    pub fn remove_at(&mut self, index: usize) -> Result<Record> {
        let len = self.records.len();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        let record = self.records.remove(index);
        debug!(id = %record.id, index, "Removed record");
        Ok(record)
    }

    /// Current position of the record with `id`.
    #[must_use]
    pub fn position_of(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Update the record with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] if no such record exists.
    pub fn update(&mut self, id: RecordId, draft: RecordDraft) -> Result<&Record> {
        let index = self.position_of(id).ok_or(Error::RecordNotFound { id })?;
        self.update_at(index, draft)
    }

    /// Remove the record with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] if no such record exists.
    pub fn remove(&mut self, id: RecordId) -> Result<Record> {
        let index = self.position_of(id).ok_or(Error::RecordNotFound { id })?;
        self.remove_at(index)
    }

    /// All records, newest first.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Summary statistics.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            total_records: self.records.len(),
            oldest_timestamp: self.records.iter().map(|r| r.timestamp).min(),
            newest_timestamp: self.records.iter().map(|r| r.timestamp).max(),
        }
    }
}

/// Statistics about the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    /// Total number of records held.
    pub total_records: usize,
    /// Earliest record timestamp.
    pub oldest_timestamp: Option<DateTime<Utc>>,
    /// Latest record timestamp.
    pub newest_timestamp: Option<DateTime<Utc>>,
}
