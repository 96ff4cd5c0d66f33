use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScopeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Server Error: {0}")]
    Server(String),
}

pub type ScopeResult<T> = Result<T, ScopeError>;
