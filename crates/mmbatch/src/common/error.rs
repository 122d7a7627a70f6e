use thiserror::Error;

use crate::common::error::MmError::GenericError;

#[derive(Debug, Error)]
pub enum MmError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Deserialization error: {0}")]
    DeserializationError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Watch error: {0}")]
    WatchError(String),
    #[error("Error: {0}")]
    GenericError(String),
}

impl From<toml::de::Error> for MmError {
    fn from(error: toml::de::Error) -> Self {
        Self::DeserializationError(error.to_string())
    }
}

impl From<notify::Error> for MmError {
    fn from(error: notify::Error) -> Self {
        Self::WatchError(error.to_string())
    }
}

pub fn error<T>(message: String) -> crate::Result<T> {
    Err(GenericError(message))
}
