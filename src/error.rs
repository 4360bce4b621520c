use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Tun builder refused directive #{index}: {directive}")]
    Directive { index: usize, directive: String },
}

pub type Result<T> = std::result::Result<T, AppError>;
