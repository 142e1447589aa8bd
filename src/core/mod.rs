/*!
 * Core Module
 * Lock primitive, wait layer, guards, and error handling
 */

pub mod errors;
pub mod guard;
pub mod limits;
pub mod sync;
pub mod types;

// Re-export for convenience
pub use errors::*;
pub use guard::{ExclusiveGuard, Guard, GuardDrop, GuardMetadata, SharedGuard};
pub use types::*;
