/*!
 * Transactional Cache
 *
 * A key/value cache facade that guards its committed data with a
 * `ReentrantRwLock`:
 * - Per-thread transaction overlays (set / delete / commit / abort)
 * - Read-through from a pluggable `BackingStore`
 * - Write-through commits inside a store transaction, rolled back on failure
 */

mod store;
mod transaction;
mod tx_cache;

pub use store::{BackingStore, MemoryStore, StoreError, StoreResult};
pub use tx_cache::TxCache;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum CacheError {
    #[error("Transaction already open on this thread")]
    #[diagnostic(
        code(cache::transaction_already_open),
        help("Commit or abort the current transaction before beginning another.")
    )]
    TransactionAlreadyOpen,

    #[error("No transaction open on this thread")]
    #[diagnostic(
        code(cache::no_transaction),
        help("Call begin_transaction before set, delete, or commit_transaction.")
    )]
    NoTransaction,

    #[error("Backing store error: {0}")]
    #[diagnostic(code(cache::store))]
    Store(#[from] StoreError),
}
