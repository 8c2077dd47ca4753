// Port Layer - Interfaces for external dependencies

pub mod attire_store;
pub mod cleanup_store;
pub mod executing_service;
pub mod id_provider; // For deterministic testing
pub mod random_source;
pub mod time_provider;

// Re-exports
pub use attire_store::AttireStore;
pub use cleanup_store::CleanupStore;
pub use executing_service::{ExecutingService, ExecutionError, ShellKind};
pub use id_provider::{IdProvider, UuidProvider};
pub use random_source::RandomSource;
pub use time_provider::{SystemTimeProvider, TimeProvider};
