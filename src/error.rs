use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Declined by user")]
    Declined,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClipError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClipError::Validation(message.into())
    }
}

// Front ends receive errors as plain strings
impl Serialize for ClipError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClipError>;
