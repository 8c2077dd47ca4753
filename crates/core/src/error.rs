// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
///
/// Only load and persistence failures travel through this type up to the
/// entry points. Per-link failures are recorded on the link instead.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
