use std::{error::Error, fmt};

use crate::embed::EmbedError;

#[derive(Debug)]
pub enum ProcessorError {
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    Validation(String),
    Embed(EmbedError),
    Storage(anyhow::Error),
}

impl fmt::Display for ProcessorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ProcessorError::*;
        match self {
            TypeMismatch { expected, actual } => {
                write!(f, "TypeMismatch: expected instance of {}, got {}", expected, actual)
            }
            Validation(s) => write!(f, "ValidationError: {}", s),
            Embed(e) => write!(f, "EmbedError: {}", crate::unpack_error(e)),
            Storage(e) => write!(f, "StorageError: {}", e),
        }
    }
}

impl std::error::Error for ProcessorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use ProcessorError::*;
        match self {
            Embed(e) => Some(e),
            Storage(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<EmbedError> for ProcessorError {
    fn from(error: EmbedError) -> Self {
        ProcessorError::Embed(error)
    }
}

impl From<anyhow::Error> for ProcessorError {
    fn from(error: anyhow::Error) -> Self {
        ProcessorError::Storage(error)
    }
}
