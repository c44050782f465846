use std::error::Error;
use thiserror::Error;

/// Result alias for key-value store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by key-value backends regardless of where the bytes live.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or refused the operation.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Human readable context of the failed operation.
        message: String,
        /// Underlying backend failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The backing document could not be encoded or decoded.
    #[error("storage document at `{location}` is unreadable")]
    Corrupt {
        /// Where the document lives (path or logical name).
        location: String,
        /// Underlying codec failure.
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct a corrupt-document error for `location`.
    pub fn corrupt(location: impl Into<String>, source: serde_json::Error) -> Self {
        StorageError::Corrupt {
            location: location.into(),
            source,
        }
    }
}
