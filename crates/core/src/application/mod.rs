// Application Layer - Use Cases and Orchestration

pub mod operation;
pub mod services;
pub mod stop;

// Re-exports
pub use operation::{Operation, OperationPorts, OperationSettings};
pub use services::ExecutingServices;
pub use stop::{stop_channel, StopSender, StopToken};
