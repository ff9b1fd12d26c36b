// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Parse error: {0}")]
    Parse(#[from] crate::port::ParseError),

    #[error("Progress error: {0}")]
    Progress(#[from] crate::port::ProgressError),

    /// Every candidate file is done or locked by another reviewer.
    /// Expected terminal condition, not a failure.
    #[error("No available work for task '{task_id}'")]
    NoAvailableWork { task_id: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// True when the error only means "nothing left to review right now"
    pub fn is_no_available_work(&self) -> bool {
        matches!(self, AppError::NoAvailableWork { .. })
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
