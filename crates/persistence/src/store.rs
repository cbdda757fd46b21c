// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Draft stores: keyed slot storage for serialized form snapshots.

use diesel::SqliteConnection;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::info;

use crate::backend;
use crate::data_models::{DraftRecord, SaveOutcome};
use crate::error::PersistenceError;
use crate::{mutations, queries};

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A store shared between a page and its autosaver.
pub type SharedDraftStore = Arc<Mutex<dyn DraftStore>>;

/// Keyed storage for draft snapshots.
///
/// Saves carry the writing autosaver's token and sequence number. A store
/// never replaces a draft with an older one from the same writer; a draft
/// from another writer always takes the slot.
pub trait DraftStore: Send {
    /// Stores `record` under `record.key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable or the write fails.
    fn save(&mut self, record: &DraftRecord) -> Result<SaveOutcome, PersistenceError>;

    /// Reads the draft stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable or the read fails.
    fn restore(&mut self, key: &str) -> Result<Option<DraftRecord>, PersistenceError>;

    /// Deletes the draft stored under `key`. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable or the delete fails.
    fn discard(&mut self, key: &str) -> Result<bool, PersistenceError>;
}

/// Wraps a concrete store for sharing.
pub fn shared<S: DraftStore + 'static>(store: S) -> SharedDraftStore {
    Arc::new(Mutex::new(store))
}

/// Draft store backed by a `SQLite` database through Diesel.
pub struct SqliteDraftStore {
    conn: SqliteConnection,
}

impl SqliteDraftStore {
    /// Creates a store over a fresh in-memory database.
    ///
    /// Each call receives a unique shared-cache database name, so stores
    /// never see each other's drafts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:drafts_{db_id}?mode=memory&cache=shared");

        let conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;

        Ok(Self { conn })
    }

    /// Creates a store over a file-based database, enabling WAL mode.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        info!("Draft store opened at {}", path_str);

        Ok(Self { conn })
    }
}

impl DraftStore for SqliteDraftStore {
    fn save(&mut self, record: &DraftRecord) -> Result<SaveOutcome, PersistenceError> {
        mutations::upsert_draft(&mut self.conn, record)
    }

    fn restore(&mut self, key: &str) -> Result<Option<DraftRecord>, PersistenceError> {
        queries::get_draft(&mut self.conn, key)
    }

    fn discard(&mut self, key: &str) -> Result<bool, PersistenceError> {
        mutations::delete_draft(&mut self.conn, key)
    }
}

/// Draft store held in process memory.
///
/// Can be switched to an unavailable state to exercise degraded storage.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    drafts: HashMap<String, DraftRecord>,
    unavailable: bool,
    writes: usize,
}

impl MemoryDraftStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with `StorageUnavailable` (or succeed again).
    pub const fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Number of saves that reached storage.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&DraftRecord> {
        self.drafts.get(key)
    }

    fn check_available(&self) -> Result<(), PersistenceError> {
        if self.unavailable {
            return Err(PersistenceError::StorageUnavailable(String::from(
                "memory store switched off",
            )));
        }
        Ok(())
    }
}

impl DraftStore for MemoryDraftStore {
    fn save(&mut self, record: &DraftRecord) -> Result<SaveOutcome, PersistenceError> {
        self.check_available()?;
        if self
            .drafts
            .get(&record.key)
            .is_some_and(|stored| !stored.is_replaced_by(record))
        {
            return Ok(SaveOutcome::Stale);
        }
        self.drafts.insert(record.key.clone(), record.clone());
        self.writes += 1;
        Ok(SaveOutcome::Stored)
    }

    fn restore(&mut self, key: &str) -> Result<Option<DraftRecord>, PersistenceError> {
        self.check_available()?;
        Ok(self.drafts.get(key).cloned())
    }

    fn discard(&mut self, key: &str) -> Result<bool, PersistenceError> {
        self.check_available()?;
        Ok(self.drafts.remove(key).is_some())
    }
}
