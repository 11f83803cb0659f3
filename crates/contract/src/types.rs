//! Upload and download value shapes exchanged through the file service.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, DuplexStream};
use tokio::task::JoinHandle;

use crate::error::FileServiceError;

/// A file the host has staged on local disk (e.g. from multipart capture).
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Path to the staged bytes on local disk.
    pub path: PathBuf,
    /// Original filename as supplied by the client.
    pub original_name: String,
    /// MIME type of the file.
    pub content_type: String,
}

impl UploadedFile {
    /// Create a new uploaded file handle.
    #[must_use]
    pub fn new(
        path: impl Into<PathBuf>,
        original_name: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            original_name: original_name.into(),
            content_type: content_type.into(),
        }
    }
}

/// Locator addressing a stored object by its key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLocator {
    /// Storage key of the object.
    pub file_key: String,
}

impl FileLocator {
    /// Create a locator for the given key.
    #[must_use]
    pub fn new(file_key: impl Into<String>) -> Self {
        Self {
            file_key: file_key.into(),
        }
    }
}

/// Result of a successful upload.
///
/// An immutable snapshot of the store's addressing of the object at upload
/// time. The key uniquely identifies the stored bytes until a delete is
/// issued against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    /// Storage key the object was written to.
    pub key: String,
    /// Retrieval URL for the object.
    pub url: String,
}

/// Request for a streaming upload destination.
#[derive(Debug, Clone)]
pub struct UploadStreamRequest {
    /// Logical name for the object; the adapter derives the key from it.
    pub name: String,
    /// MIME type the object will be tagged with.
    pub content_type: String,
}

impl UploadStreamRequest {
    /// Create a new streaming upload request.
    #[must_use]
    pub fn new(name: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
        }
    }
}

/// Readable byte stream handed to the caller for download.
///
/// The caller owns the stream and must drain or drop it on every exit path.
pub type DownloadStream = Box<dyn AsyncRead + Send + Unpin>;

/// Handle for a caller-driven streaming upload.
///
/// The caller writes bytes into `write_stream` and shuts it down when done;
/// `completion` settles exactly once, with the upload result when the
/// destination write stream finishes or with the error it raised. The
/// completion result's `url` is the bare object key; `url` on this
/// descriptor is the public-style address built from bucket name and key,
/// regardless of whether the object is actually publicly readable.
#[derive(Debug)]
pub struct UploadStreamDescriptor {
    /// Sink the caller streams bytes into. Shutting it down (or dropping it)
    /// signals end of input.
    pub write_stream: DuplexStream,
    /// Settles once the destination write stream completes or fails.
    pub completion: JoinHandle<Result<UploadResult, FileServiceError>>,
    /// Public-style URL for the destination object.
    pub url: String,
    /// Storage key the object will be written to.
    pub file_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_locator_new() {
        let locator = FileLocator::new("uploads/report.pdf");
        assert_eq!(locator.file_key, "uploads/report.pdf");
    }

    #[test]
    fn test_upload_result_serde_roundtrip() {
        let result = UploadResult {
            key: "uploads/photo.png".to_string(),
            url: "https://storage.googleapis.com/bucket/uploads/photo.png".to_string(),
        };
        let json = serde_json::to_string(&result).expect("serialize");
        let back: UploadResult = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, result);
    }

    #[test]
    fn test_uploaded_file_new() {
        let file = UploadedFile::new("/tmp/staged", "photo.png", "image/png");
        assert_eq!(file.original_name, "photo.png");
        assert_eq!(file.content_type, "image/png");
    }
}
