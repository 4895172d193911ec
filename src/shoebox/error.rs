use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ShoeboxError {
    #[error("Photo not found: {0}")]
    PhotoNotFound(Uuid),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, ShoeboxError>;
