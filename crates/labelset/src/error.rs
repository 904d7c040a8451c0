use thiserror::Error;

#[derive(Debug, Error)]
pub enum LabelsetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("index {index} out of range for dataset of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("dataset write lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, LabelsetError>;
