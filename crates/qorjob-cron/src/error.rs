//! Scheduler-table job errors.

use thiserror::Error;

/// Errors that can occur while managing scheduler-table jobs.
#[derive(Debug, Error)]
pub enum CronError {
    /// The list or install command could not run or exited non-zero.
    #[error("Command '{command}' failed: {reason}")]
    CommandExecution { command: String, reason: String },

    /// The detached worker process could not be started.
    #[error("Failed to spawn worker {program}: {reason}")]
    ProcessSpawn { program: String, reason: String },

    /// The recorded process id does not resolve to a live process.
    #[error("Failed to find process {pid}: {reason}")]
    ProcessLookup { pid: u32, reason: String },

    /// The process was found but could not be terminated.
    #[error("Failed to terminate process {pid}: {reason}")]
    ProcessTermination { pid: u32, reason: String },

    /// No record in the table matches the job id.
    #[error("Failed to find job {0}")]
    NotFound(String),

    /// The job has a worker process and must be killed instead.
    #[error("Failed to remove job {0} as it is running")]
    JobRunning(String),

    /// The job descriptor carries no handler.
    #[error("No handler found for job {0}")]
    NoHandler(String),

    /// The job handler reported failure.
    #[error(transparent)]
    Handler(anyhow::Error),

    /// A begin-marker line whose JSON payload could not be decoded.
    #[error("Malformed job record: {0}")]
    MalformedRecord(String),

    /// A record could not be encoded into its begin-marker payload.
    #[error("Failed to encode job record: {0}")]
    RecordEncoding(String),

    /// The job id cannot be written to a begin-marker line and read back.
    #[error("Invalid job id '{id}': {reason}")]
    InvalidJobId { id: String, reason: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CronError {
    /// Whether this error means no matching record exists.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CronError::NotFound(_))
    }
}
