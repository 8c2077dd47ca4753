// Domain Error Types

use thiserror::Error;

/// Load and validation failures of domain data
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Missing or empty '{0}' field")]
    MissingField(&'static str),

    #[error("Invalid duration '{value}': {reason}")]
    InvalidDuration { value: String, reason: String },
}

pub type Result<T> = std::result::Result<T, DomainError>;
