use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailsieveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed record at {}:{line}: missing '|' delimiter in {content:?}", path.display())]
    Format {
        path: PathBuf,
        line: usize,
        content: String,
    },

    #[error("Cannot store text {0:?}: it contains the record delimiter or a line break")]
    InvalidText(String),

    #[error("Unusable training data: {0}")]
    TrainingData(String),

    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("User input error: {0}")]
    UserInput(String),
}

impl From<dialoguer::Error> for MailsieveError {
    fn from(err: dialoguer::Error) -> Self {
        MailsieveError::UserInput(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MailsieveError>;
