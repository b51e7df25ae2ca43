use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("input path does not exist: {0}")]
    InputUnavailable(PathBuf),

    #[error("download failed: {0}")]
    DownloadFailed(#[from] DownloadError),

    #[error("malformed inline payload: {0}")]
    MalformedPayload(String),

    #[error("bundle requires {required} bytes but memory limit is {limit}")]
    MemoryLimitExceeded { required: u64, limit: u64 },

    #[error("archive is corrupt: {0}")]
    ArchiveCorrupt(String),

    #[error("name already taken: {0}")]
    NameAlreadyTaken(String),

    #[error("upstream delivery failed: {0}")]
    UpstreamDeliveryFailure(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Why a remote input could not be fetched.
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("server returned status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("redirect limit of {0} exceeded")]
    TooManyRedirects(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
