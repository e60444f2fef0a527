use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaplaceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Argument error: {0}")]
    Argument(String),

    #[error("Communication failure: {0}")]
    Comm(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type LaplaceResult<T> = Result<T, LaplaceError>;
