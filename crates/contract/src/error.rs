//! File service error types.

use thiserror::Error;

/// File service operation errors.
#[derive(Debug, Error)]
pub enum FileServiceError {
    /// File not found in storage.
    ///
    /// Raised only after an explicit existence check against the store.
    #[error("file not found: {key}")]
    NotFound {
        /// Storage key that was not found.
        key: String,
    },

    /// Adapter configuration error (bad credential blob, unusable provider
    /// settings). Fatal at construction; there is no lazy or retry path.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// Presign operation not supported by the storage provider.
    #[error("presign operation not supported by storage provider")]
    PresignNotSupported,

    /// Local stream I/O failure while staging or pumping bytes.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Remote store operation failure.
    #[error("storage operation failed: {0}")]
    Operation(String),
}

impl FileServiceError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an operation error.
    #[must_use]
    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display_names_key() {
        let err = FileServiceError::not_found("uploads/invoice.pdf");
        assert_eq!(err.to_string(), "file not found: uploads/invoice.pdf");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = FileServiceError::from(io);
        assert!(matches!(err, FileServiceError::Io(_)));
    }

    #[test]
    fn test_configuration_display() {
        let err = FileServiceError::configuration("invalid service account key");
        assert!(err.to_string().contains("invalid service account key"));
    }
}
