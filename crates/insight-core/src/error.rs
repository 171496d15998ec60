use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("No input files: {0}")]
    NoInputFiles(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
