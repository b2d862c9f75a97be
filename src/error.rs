use std::path::PathBuf;

use thiserror::Error;

/// Failures reading or writing persisted state.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid saved data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no data directory could be resolved for this platform")]
    NoDataDir,
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failures surfaced to the user by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Please select a project first!")]
    NoProjectSelected,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("CSV error: {0}")]
    Csv(String),
}

pub type StorageResult<T> = Result<T, StorageError>;
pub type SessionResult<T> = Result<T, SessionError>;
