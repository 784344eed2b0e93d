use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No backend is installed (missing or invalid connection string).
    #[error("storage unavailable: {reason}")]
    NotConfigured { reason: String },
    /// The backend rejected or failed a statement.
    #[error("{message}")]
    Backend {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl StorageError {
    /// Construct a backend error, keeping the whole cause chain in the message.
    pub fn backend(source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Backend {
            message: describe_chain(&source),
            source: Box::new(source),
        }
    }
}

/// Flatten an error and its sources into `outer: inner: root`.
fn describe_chain(err: &(dyn Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut current = err.source();
    while let Some(source) = current {
        message.push_str(": ");
        message.push_str(&source.to_string());
        current = source.source();
    }
    message
}
