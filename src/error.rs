use std::path::PathBuf;
use thiserror::Error;

pub type IngestResult<T> = std::result::Result<T, IngestError>;

/// Failure taxonomy for one file-processing cycle. Which of these halt the
/// run is the orchestrator's decision, not the leaf's.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("malformed filename {name:?}: {reason}")]
    MalformedFilename { name: String, reason: String },

    #[error("malformed content: {0}")]
    MalformedContent(String),

    #[error("malformed record at data row {row}: {reason}")]
    MalformedRecord { row: usize, reason: String },

    #[error("push to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },

    #[error("filesystem error on {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IngestError {
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}
