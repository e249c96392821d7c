//! Error types for calcron.

use thiserror::Error;

/// Errors that can occur in calcron operations.
#[derive(Error, Debug)]
pub enum CalcronError {
    /// The event start matched neither accepted timestamp layout. A schedule
    /// computed from a defaulted time would be syntactically valid but fire
    /// on a nonsense date, so this is always a hard failure.
    #[error("Unparseable event start time: '{0}'")]
    UnparseableTimestamp(String),

    /// The underlying table write exited nonzero. The message carries the
    /// captured command output for diagnosis.
    #[error("Crontab mutation failed: {0}")]
    TableMutation(String),

    #[error("Command exited with status {status}\nOutput: {output}")]
    CommandFailed { status: i32, output: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for calcron operations.
pub type CalcronResult<T> = Result<T, CalcronError>;
