/*!
 * Synchronization Primitives
 *
 * The reentrant readers-writer lock and the wait layer it blocks through:
 * - Condvar-based wait/notify (default)
 * - Adaptive spinwait for very short critical sections
 *
 * # Architecture
 *
 * All lock bookkeeping lives in one state object behind a short-held
 * `parking_lot::Mutex`. Blocking acquires park through a `Waiter`, which
 * gives the mutex up while blocked and re-checks the wait predicate under it.
 */

mod condvar;
mod config;
pub mod locks;
mod spinwait;
mod traits;
mod wait;

pub use config::{StrategyType, SyncConfig};
pub use locks::{LockSnapshot, LockStats, ReentrantRwLock, StatsSnapshot};
pub use traits::{WaitEvent, WaitStrategy, WakeResult};
pub use wait::Waiter;

// Re-export specific strategies for advanced users
pub use condvar::CondvarWait;
pub use spinwait::SpinWait;
