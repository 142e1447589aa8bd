/*!
 * Transactional Cache
 *
 * Key/value cache over a `BackingStore` with per-thread transactions.
 *
 * # Design
 *
 * - Each thread buffers its writes in a private overlay until commit
 * - Reads of committed data take shared access to the cache lock
 * - Commits (and `update`) take exclusive access, so a reader holding
 *   shared access never observes half of a commit
 * - Nested reads inside an exclusive hold re-enter the lock instead of
 *   deadlocking on it
 */

use super::store::{BackingStore, StoreResult};
use super::transaction::{Lookup, PendingOps};
use super::{CacheError, CacheResult};
use crate::core::sync::{ReentrantRwLock, SyncConfig};
use crate::core::types::{current_holder, HolderId};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, error, instrument, warn};

/// Transactional key/value cache
///
/// # Example
///
/// ```
/// use reentrant_rwlock::{MemoryStore, TxCache};
///
/// let cache = TxCache::new(MemoryStore::new());
///
/// cache.begin_transaction().unwrap();
/// cache.set("user:1", "ada").unwrap();
/// assert_eq!(cache.get("user:1").unwrap().as_deref(), Some("ada"));
/// cache.commit_transaction().unwrap();
///
/// assert_eq!(cache.get_committed("user:1").unwrap().as_deref(), Some("ada"));
/// ```
pub struct TxCache<S: BackingStore> {
    committed: DashMap<String, String, ahash::RandomState>,
    pending: DashMap<HolderId, PendingOps, ahash::RandomState>,
    lock: ReentrantRwLock,
    store: S,
}

impl<S: BackingStore> TxCache<S> {
    /// Create a cache over `store` with the default lock configuration
    pub fn new(store: S) -> Self {
        Self::with_config(store, SyncConfig::default())
    }

    /// Create a cache over `store` with a specific lock configuration
    pub fn with_config(store: S, config: SyncConfig) -> Self {
        Self {
            committed: DashMap::with_hasher(ahash::RandomState::new()),
            pending: DashMap::with_hasher(ahash::RandomState::new()),
            lock: ReentrantRwLock::with_config(config),
            store,
        }
    }

    /// Open a transaction for the calling thread
    pub fn begin_transaction(&self) -> CacheResult<()> {
        match self.pending.entry(current_holder()) {
            Entry::Occupied(_) => Err(CacheError::TransactionAlreadyOpen),
            Entry::Vacant(slot) => {
                slot.insert(PendingOps::default());
                Ok(())
            }
        }
    }

    /// Whether the calling thread has an open transaction
    pub fn in_transaction(&self) -> bool {
        self.pending.contains_key(&current_holder())
    }

    /// Buffer a write in the calling thread's transaction
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> CacheResult<()> {
        let mut ops = self
            .pending
            .get_mut(&current_holder())
            .ok_or(CacheError::NoTransaction)?;
        ops.set(key.into(), value.into());
        Ok(())
    }

    /// Buffer a delete in the calling thread's transaction
    pub fn delete(&self, key: impl Into<String>) -> CacheResult<()> {
        let mut ops = self
            .pending
            .get_mut(&current_holder())
            .ok_or(CacheError::NoTransaction)?;
        ops.delete(key.into());
        Ok(())
    }

    /// Read `key` as the calling thread sees it
    ///
    /// The thread's own uncommitted writes win; a pending delete reads as
    /// `None`. Otherwise falls back to [`get_committed`](Self::get_committed).
    pub fn get(&self, key: &str) -> CacheResult<Option<String>> {
        if let Some(ops) = self.pending.get(&current_holder()) {
            match ops.lookup(key) {
                Lookup::Updated(value) => return Ok(Some(value.to_owned())),
                Lookup::Deleted => return Ok(None),
                Lookup::Untouched => {}
            }
        }

        self.get_committed(key)
    }

    /// Read the committed value of `key`, filling the cache from the store
    /// on a miss
    pub fn get_committed(&self, key: &str) -> CacheResult<Option<String>> {
        let _read = self.lock.read();

        if let Some(value) = self.committed.get(key) {
            return Ok(Some(value.clone()));
        }

        let fetched = self.store.select(key)?;
        if let Some(value) = &fetched {
            self.committed.insert(key.to_owned(), value.clone());
        }
        Ok(fetched)
    }

    /// Read several keys under one shared hold
    ///
    /// No commit can land between the individual reads.
    pub fn get_many(&self, keys: &[&str]) -> CacheResult<Vec<Option<String>>> {
        let _read = self.lock.read();
        keys.iter().map(|key| self.get(key)).collect()
    }

    /// Write the calling thread's transaction through to the store and
    /// publish it
    ///
    /// Returns the number of keys written. The transaction is closed whether
    /// or not the store accepts it; on a store error the store is rolled
    /// back and the cache is left unchanged.
    #[instrument(skip(self), fields(thread = ?current_holder()))]
    pub fn commit_transaction(&self) -> CacheResult<usize> {
        let (_, ops) = self
            .pending
            .remove(&current_holder())
            .ok_or(CacheError::NoTransaction)?;

        let _write = self.lock.write();

        self.store.begin()?;
        if let Err(e) = self.write_through(&ops) {
            warn!(error = %e, "store rejected transaction, rolling back");
            self.rollback_store();
            return Err(e.into());
        }

        let applied = ops.len();
        let (updated, deleted) = ops.into_parts();
        for (key, value) in updated {
            self.committed.insert(key, value);
        }
        for key in deleted {
            self.committed.remove(&key);
        }

        debug!(applied, "transaction committed");
        Ok(applied)
    }

    fn write_through(&self, ops: &PendingOps) -> StoreResult<()> {
        for (key, value) in ops.updated() {
            self.store.upsert(key, value)?;
        }
        for key in ops.deleted() {
            self.store.remove(key)?;
        }
        self.store.commit()
    }

    fn rollback_store(&self) {
        if let Err(e) = self.store.rollback() {
            error!(error = %e, "store rollback failed");
        }
    }

    /// Discard the calling thread's transaction
    ///
    /// Returns whether a transaction was open.
    pub fn abort_transaction(&self) -> bool {
        self.pending.remove(&current_holder()).is_some()
    }

    /// Atomic read-modify-write of a committed key, outside any transaction
    ///
    /// `f` receives the committed value and returns the new one (`None`
    /// deletes). Readers see either the old or the new value, never a gap.
    pub fn update<F>(&self, key: &str, f: F) -> CacheResult<Option<String>>
    where
        F: FnOnce(Option<String>) -> Option<String>,
    {
        let _write = self.lock.write();

        // Shared re-entry while holding exclusive access
        let current = self.get_committed(key)?;
        let next = f(current);

        self.store.begin()?;
        let written = match &next {
            Some(value) => self.store.upsert(key, value),
            None => self.store.remove(key),
        }
        .and_then(|()| self.store.commit());

        if let Err(e) = written {
            warn!(key, error = %e, "store rejected update, rolling back");
            self.rollback_store();
            return Err(e.into());
        }

        match &next {
            Some(value) => {
                self.committed.insert(key.to_owned(), value.clone());
            }
            None => {
                self.committed.remove(key);
            }
        }
        Ok(next)
    }

    /// Number of committed entries held in memory
    pub fn cached_len(&self) -> usize {
        self.committed.len()
    }

    /// The lock guarding the committed map
    pub fn lock(&self) -> &ReentrantRwLock {
        &self.lock
    }

    /// The backing store
    pub fn store(&self) -> &S {
        &self.store
    }
}
