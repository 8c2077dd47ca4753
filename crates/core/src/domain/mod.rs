// Domain Layer - Pure operation model and expansion logic

pub mod ability;
pub mod adversary;
pub mod attire;
pub mod duration;
pub mod error;
pub mod executor;
pub mod fact;
pub mod host;
pub mod knowledge;
pub mod link;
pub mod operation_state;

// Re-exports
pub use ability::{Ability, AbilityRecord, LinkBatch, DEFAULT_TACTIC};
pub use adversary::Adversary;
pub use attire::{AttireLog, ExecutionCategory, ExecutionData, OutputBlock, OutputLevel, Procedure, Step};
pub use error::DomainError;
pub use executor::Executor;
pub use fact::{Fact, FactStore, Source};
pub use host::HostProfile;
pub use link::{Link, LinkIssuer, LinkRecord, LinkStatus};
pub use operation_state::OperationState;
