/*!
 * Backing Store
 *
 * The durable side of the transactional cache. The cache reads through to
 * the store on a miss and writes committed transactions to it inside a
 * store-level transaction.
 */

use ahash::AHashMap;
use miette::Diagnostic;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Backing store errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    #[diagnostic(code(store::unavailable), help("The store could not be reached; retry later."))]
    Unavailable(String),

    #[error("Store rejected write to '{key}': {reason}")]
    #[diagnostic(code(store::rejected))]
    Rejected { key: String, reason: String },

    #[error("No store transaction open")]
    #[diagnostic(code(store::no_transaction))]
    NoTransaction,

    #[error("Store transaction already open")]
    #[diagnostic(code(store::transaction_open))]
    TransactionOpen,
}

/// Durable key/value storage behind a `TxCache`
///
/// `upsert`/`remove` between `begin` and `commit` must become visible
/// atomically at `commit`, and be discarded by `rollback`.
pub trait BackingStore: Send + Sync {
    /// Read the durable value of `key`
    fn select(&self, key: &str) -> StoreResult<Option<String>>;

    /// Create or update `key`
    fn upsert(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete `key` (deleting an absent key is not an error)
    fn remove(&self, key: &str) -> StoreResult<()>;

    /// Open a store transaction
    fn begin(&self) -> StoreResult<()>;

    /// Make the open transaction's writes visible
    fn commit(&self) -> StoreResult<()>;

    /// Discard the open transaction's writes
    fn rollback(&self) -> StoreResult<()>;
}

#[derive(Debug, Clone)]
enum Staged {
    Upsert(String, String),
    Remove(String),
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    rows: AHashMap<String, String>,
    staged: Option<Vec<Staged>>,
}

/// In-memory `BackingStore`
///
/// Writes outside a transaction apply immediately; inside one they are
/// staged until `commit`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryStoreInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `rows`
    pub fn with_rows<I, K, V>(rows: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            inner: Mutex::new(MemoryStoreInner { rows, staged: None }),
        }
    }

    /// Number of durable rows
    pub fn len(&self) -> usize {
        self.inner.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a store transaction is open
    pub fn in_transaction(&self) -> bool {
        self.inner.lock().staged.is_some()
    }

    fn stage_or_apply(&self, op: Staged) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        match inner.staged.as_mut() {
            Some(staged) => staged.push(op),
            None => apply(&mut inner.rows, op),
        }
    }
}

fn apply(rows: &mut AHashMap<String, String>, op: Staged) {
    match op {
        Staged::Upsert(key, value) => {
            rows.insert(key, value);
        }
        Staged::Remove(key) => {
            rows.remove(&key);
        }
    }
}

impl BackingStore for MemoryStore {
    fn select(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.inner.lock().rows.get(key).cloned())
    }

    fn upsert(&self, key: &str, value: &str) -> StoreResult<()> {
        self.stage_or_apply(Staged::Upsert(key.to_owned(), value.to_owned()));
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.stage_or_apply(Staged::Remove(key.to_owned()));
        Ok(())
    }

    fn begin(&self) -> StoreResult<()> {
        let mut inner = self.inner.lock();
        if inner.staged.is_some() {
            return Err(StoreError::TransactionOpen);
        }
        inner.staged = Some(Vec::new());
        Ok(())
    }

    fn commit(&self) -> StoreResult<()> {
        let mut inner = self.inner.lock();
        let staged = inner.staged.take().ok_or(StoreError::NoTransaction)?;
        for op in staged {
            apply(&mut inner.rows, op);
        }
        Ok(())
    }

    fn rollback(&self) -> StoreResult<()> {
        self.inner
            .lock()
            .staged
            .take()
            .map(|_| ())
            .ok_or(StoreError::NoTransaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staged_writes_invisible_until_commit() {
        let store = MemoryStore::with_rows([("a", "1")]);

        store.begin().unwrap();
        store.upsert("b", "2").unwrap();
        store.remove("a").unwrap();
        assert_eq!(store.select("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.select("b").unwrap(), None);

        store.commit().unwrap();
        assert_eq!(store.select("a").unwrap(), None);
        assert_eq!(store.select("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_rollback_discards() {
        let store = MemoryStore::new();
        store.begin().unwrap();
        store.upsert("k", "v").unwrap();
        store.rollback().unwrap();

        assert!(store.is_empty());
        assert!(!store.in_transaction());
        assert_eq!(store.rollback(), Err(StoreError::NoTransaction));
    }

    #[test]
    fn test_nested_begin_rejected() {
        let store = MemoryStore::new();
        store.begin().unwrap();
        assert_eq!(store.begin(), Err(StoreError::TransactionOpen));
    }

    #[test]
    fn test_writes_outside_transaction_apply_directly() {
        let store = MemoryStore::new();
        store.upsert("k", "v").unwrap();
        assert_eq!(store.len(), 1);
    }
}
