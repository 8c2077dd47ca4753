// adversim Infrastructure - File Adapters
// Implements: AttireStore, CleanupStore, data file loading

mod atomic;
mod attire_store;
mod cleanup_store;
pub mod loader;

pub use attire_store::JsonAttireStore;
pub use cleanup_store::JsonCleanupStore;
pub use loader::{load_abilities, load_adversary, load_source};

/// Attire log of a normal run
pub const LOG_FILE: &str = "log.json";
/// Attire log of a standalone cleanup run
pub const CLEANUP_LOG_FILE: &str = "cleanup_log.json";
/// Deferred cleanup queue written by a normal run
pub const CLEANUPS_FILE: &str = "cleanups.json";
/// Remainder of an interrupted standalone cleanup
pub const NOT_COMPLETED_CLEANUPS_FILE: &str = "not_completed_cleanups.json";
