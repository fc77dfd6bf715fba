use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("quota exceeded writing {key}: {needed} bytes over a {quota}-byte quota")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("session store read error: {0}")]
    Read(String),

    #[error("session store write error: {0}")]
    Write(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
