//! The file service capability trait.

use async_trait::async_trait;

use crate::error::FileServiceError;
use crate::types::{
    DownloadStream, FileLocator, UploadResult, UploadStreamDescriptor, UploadStreamRequest,
    UploadedFile,
};

/// Pluggable file service capability.
///
/// The host's dependency-injection wiring selects one implementation at
/// configuration time and calls these operations uninterpreted. Every call
/// is an independent request/response round trip; the adapter imposes no
/// serialization or ordering between concurrent calls, and concurrent
/// writes to the same key race with last-writer-wins semantics.
#[async_trait]
pub trait FileService: Send + Sync {
    /// Upload a staged file to the public area of the store.
    ///
    /// The destination key is derived from the configured prefix and the
    /// file's base name; an existing object at that key is overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error on any I/O or store failure during streaming.
    async fn upload(&self, file: &UploadedFile) -> Result<UploadResult, FileServiceError>;

    /// Upload a staged file to the protected area of the store.
    ///
    /// Same mechanics as [`upload`](Self::upload) with the destination key
    /// placed under the protected subtree.
    ///
    /// # Errors
    ///
    /// Returns an error on any I/O or store failure during streaming.
    async fn upload_protected(
        &self,
        file: &UploadedFile,
    ) -> Result<UploadResult, FileServiceError>;

    /// Delete the object at the locator's key.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the delete; failures are never
    /// silently swallowed.
    async fn delete(&self, locator: &FileLocator) -> Result<(), FileServiceError>;

    /// Open a caller-driven streaming upload.
    ///
    /// Returns immediately with a writable sink and a completion handle; the
    /// caller owns writing to the sink and must shut it down on every exit
    /// path.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination write stream cannot be opened.
    async fn get_upload_stream_descriptor(
        &self,
        request: UploadStreamRequest,
    ) -> Result<UploadStreamDescriptor, FileServiceError>;

    /// Open a readable stream over the object at the locator's key.
    ///
    /// # Errors
    ///
    /// Returns [`FileServiceError::NotFound`] if no object exists at the
    /// key; the existence check happens before any stream is opened.
    async fn get_download_stream(
        &self,
        locator: &FileLocator,
    ) -> Result<DownloadStream, FileServiceError>;

    /// Generate a long-lived signed read URL for the object at the
    /// locator's key.
    ///
    /// # Errors
    ///
    /// Returns [`FileServiceError::NotFound`] if no object exists at the
    /// key.
    async fn get_presigned_download_url(
        &self,
        locator: &FileLocator,
    ) -> Result<String, FileServiceError>;
}
