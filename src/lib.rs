/*!
 * Reentrant Readers-Writer Lock Library
 *
 * A recursive readers-writer lock with writer priority, RAII guards, and a
 * transactional key/value cache built on top of it.
 */

pub mod cache;
pub mod core;
pub mod monitoring;

// Re-exports
pub use crate::core::errors::*;
pub use crate::core::guard::{ExclusiveGuard, Guard, SharedGuard};
pub use crate::core::sync::{
    LockSnapshot, ReentrantRwLock, StatsSnapshot, StrategyType, SyncConfig,
};
pub use cache::{
    BackingStore, CacheError, CacheResult, MemoryStore, StoreError, StoreResult, TxCache,
};
pub use monitoring::init_tracing;
