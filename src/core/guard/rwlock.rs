/*!
 * Readers-Writer Lock Guards
 *
 * Shared and exclusive holds on a `ReentrantRwLock`, released on drop
 */

use super::traits::{Guard, GuardDrop};
use super::GuardMetadata;
use crate::core::errors::{GuardError, GuardResult};
use crate::core::sync::ReentrantRwLock;
use std::marker::PhantomData;
use tracing::error;

/// Marker that keeps a guard on its acquiring thread
type NotSend = PhantomData<*const ()>;

/// One level of shared access
///
/// # Example
///
/// ```rust
/// use reentrant_rwlock::{Guard, ReentrantRwLock};
///
/// let lock = ReentrantRwLock::new();
/// let mut guard = lock.read();
/// assert_eq!(lock.read_count_current_thread(), 1);
///
/// guard.release().unwrap();
/// assert!(guard.release().is_err()); // already released
/// ```
#[must_use = "the shared hold is released as soon as the guard is dropped"]
pub struct SharedGuard<'a> {
    lock: &'a ReentrantRwLock,
    metadata: GuardMetadata,
    active: bool,
    _thread: NotSend,
}

impl<'a> SharedGuard<'a> {
    /// Wrap a shared hold already taken on `lock` by this thread
    pub(crate) fn new(lock: &'a ReentrantRwLock) -> Self {
        Self {
            lock,
            metadata: GuardMetadata::new("rwlock_shared"),
            active: true,
            _thread: PhantomData,
        }
    }

    /// The lock this guard holds
    #[inline]
    pub fn lock(&self) -> &'a ReentrantRwLock {
        self.lock
    }
}

impl Guard for SharedGuard<'_> {
    fn resource_type(&self) -> &'static str {
        self.metadata.resource_type
    }

    fn metadata(&self) -> &GuardMetadata {
        &self.metadata
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn release(&mut self) -> GuardResult<()> {
        if !self.active {
            return Err(GuardError::AlreadyReleased);
        }
        self.active = false;
        self.lock.release_shared().map_err(GuardError::from)
    }
}

impl GuardDrop for SharedGuard<'_> {
    fn on_drop(&mut self) {
        if self.active {
            if let Err(e) = self.release() {
                error!(error = %e, held_us = self.metadata.lifetime_micros(), "shared guard release failed");
            }
        }
    }
}

impl Drop for SharedGuard<'_> {
    fn drop(&mut self) {
        self.on_drop();
    }
}

/// One level of exclusive access
///
/// Nested `read()`/`write()` calls on the same lock from the owning thread
/// succeed immediately and add to the write depth.
#[must_use = "the exclusive hold is released as soon as the guard is dropped"]
pub struct ExclusiveGuard<'a> {
    lock: &'a ReentrantRwLock,
    metadata: GuardMetadata,
    active: bool,
    _thread: NotSend,
}

impl<'a> ExclusiveGuard<'a> {
    /// Wrap an exclusive hold already taken on `lock` by this thread
    pub(crate) fn new(lock: &'a ReentrantRwLock) -> Self {
        Self {
            lock,
            metadata: GuardMetadata::new("rwlock_exclusive"),
            active: true,
            _thread: PhantomData,
        }
    }

    /// The lock this guard holds
    #[inline]
    pub fn lock(&self) -> &'a ReentrantRwLock {
        self.lock
    }
}

impl Guard for ExclusiveGuard<'_> {
    fn resource_type(&self) -> &'static str {
        self.metadata.resource_type
    }

    fn metadata(&self) -> &GuardMetadata {
        &self.metadata
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn release(&mut self) -> GuardResult<()> {
        if !self.active {
            return Err(GuardError::AlreadyReleased);
        }
        self.active = false;
        self.lock.release_exclusive().map_err(GuardError::from)
    }
}

impl GuardDrop for ExclusiveGuard<'_> {
    fn on_drop(&mut self) {
        if self.active {
            if let Err(e) = self.release() {
                error!(error = %e, held_us = self.metadata.lifetime_micros(), "exclusive guard release failed");
            }
        }
    }
}

impl Drop for ExclusiveGuard<'_> {
    fn drop(&mut self) {
        self.on_drop();
    }
}
