//! Job error types.

use thiserror::Error;

pub type JobResult<T> = Result<T, JobError>;

/// Errors that escape a run.
///
/// Per-video lookups, pagination and uploads recover locally; anything
/// surfacing here fails the run with status 500.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Run aborted: {0}")]
    RunAborted(String),

    #[error("Payload encoding failed: {0}")]
    Payload(#[from] timecode_models::PayloadError),

    #[error("YouTube error: {0}")]
    YouTube(#[from] timecode_youtube::YouTubeError),

    #[error("Storage error: {0}")]
    Storage(#[from] timecode_storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl JobError {
    pub fn run_aborted(msg: impl Into<String>) -> Self {
        Self::RunAborted(msg.into())
    }
}
