/*!
 * RAII Lock Guards
 *
 * Scoped holds on a `ReentrantRwLock` with automatic release.
 *
 * ## Design Principles
 *
 * 1. **Thread-Bound**: Guards are `!Send`; the hold belongs to the acquiring thread
 * 2. **Nestable**: Guards borrow the lock immutably, so recursive guards stack
 * 3. **Observable**: Failed releases are logged, never panicked on
 *
 * ## Example
 *
 * ```rust
 * use reentrant_rwlock::ReentrantRwLock;
 *
 * let lock = ReentrantRwLock::new();
 * let outer = lock.write();
 * {
 *     let _inner = lock.read(); // folds into the write depth
 * }
 * drop(outer); // lock fully released
 * assert!(!lock.is_locked());
 * ```
 */

mod rwlock;
mod traits;

pub use rwlock::{ExclusiveGuard, SharedGuard};
pub use traits::{Guard, GuardDrop};

use crate::core::types::{current_holder, HolderId};
use std::time::Instant;

/// Guard metadata for observability
#[derive(Debug, Clone)]
pub struct GuardMetadata {
    pub resource_type: &'static str,
    pub creation_time: Instant,
    pub holder: HolderId,
}

impl GuardMetadata {
    #[inline]
    pub fn new(resource_type: &'static str) -> Self {
        Self {
            resource_type,
            creation_time: Instant::now(),
            holder: current_holder(),
        }
    }

    #[inline]
    pub fn lifetime_micros(&self) -> u64 {
        self.creation_time.elapsed().as_micros() as u64
    }
}
