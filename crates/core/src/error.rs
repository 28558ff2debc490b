use thiserror::Error;

#[derive(Error, Debug)]
pub enum MinerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid rule pattern `{name}`: {reason}")]
    InvalidPattern { name: String, reason: String },

    #[error("Embedding provider error: {0}")]
    Embedding(String),

    #[error("{0}")]
    Other(String),
}
