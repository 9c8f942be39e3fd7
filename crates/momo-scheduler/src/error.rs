use thiserror::Error;

/// Errors with a synchronous caller. Everything that happens inside the
/// background task is logged instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("scheduler is already running")]
    AlreadyRunning,

    #[error("scheduler is not running")]
    NotRunning,

    #[error("daily delivery is disabled")]
    Disabled,
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
