//! In-memory state storage modules.
//!
//! Stores manage runtime state that doesn't belong in the database:
//! - `PendingLevelUpStore` - level-up previews awaiting confirmation
//! - `UserLocks` - per-user write serialization

pub mod pending_level_up;
pub mod user_locks;

pub use pending_level_up::{PendingLevelUp, PendingLevelUpStore, DEFAULT_PLAN_TTL};
pub use user_locks::UserLocks;
