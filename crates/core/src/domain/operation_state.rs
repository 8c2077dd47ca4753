// Operation State

use serde::{Deserialize, Serialize};

/// Operation lifecycle: FINISHED (idle/terminal) -> RUNNING -> FINISHED,
/// with WAITING_TO_STOP while a stop request drains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationState {
    Finished,
    Running,
    WaitingToStop,
}

impl std::fmt::Display for OperationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationState::Finished => write!(f, "FINISHED"),
            OperationState::Running => write!(f, "RUNNING"),
            OperationState::WaitingToStop => write!(f, "WAITING_TO_STOP"),
        }
    }
}
