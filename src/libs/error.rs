use anyhow::Result;
use thiserror::Error;

/**
 * Create the error type that represents all errors possible in our program
 */
#[derive(Debug, Error)]
pub enum LarkportError {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("An error occurred while manipulating the config: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error(transparent)]
    Unknown(#[from] anyhow::Error),

    /**
     * Custom errors
     */
    #[error("Credential expired or rejected by the drive service")]
    NotAuthorized,

    #[error("Drive API error {code}: {msg}")]
    Api { code: i64, msg: String },

    #[error("An export is already in progress")]
    ExportInProgress,

    #[error("No document is currently open")]
    NoActiveDocument,

    #[error("Host editor error: {0}")]
    Host(String),
}

pub type AnyResult<T, E = LarkportError> = Result<T, E>;

impl From<serde_json::Error> for LarkportError {
    fn from(error: serde_json::Error) -> Self {
        LarkportError::DeserializationError(error.to_string())
    }
}

impl From<toml::ser::Error> for LarkportError {
    fn from(error: toml::ser::Error) -> Self {
        LarkportError::SerializationError(error.to_string())
    }
}

impl From<toml::de::Error> for LarkportError {
    fn from(error: toml::de::Error) -> Self {
        LarkportError::DeserializationError(error.to_string())
    }
}
