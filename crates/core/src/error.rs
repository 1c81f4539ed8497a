use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dotenv error: {0}")]
    Dotenv(#[from] dotenvy::Error),

    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidSetting {
        key: String,
        value: String,
        reason: String,
    },
}
