//! Object storage file service implementation using Apache OpenDAL.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use bytes::BytesMut;
use chrono::Utc;
use once_cell::sync::OnceCell;
use opendal::{ErrorKind, Operator, services};
use tokio::io::AsyncReadExt;
use tokio_util::compat::FuturesAsyncReadCompatExt;

use filebridge_contract::{
    DownloadStream, FileLocator, FileService, FileServiceError, UploadResult,
    UploadStreamDescriptor, UploadStreamRequest, UploadedFile,
};

use crate::config::{StorageConfig, StorageProvider};

/// Chunk size for pumping bytes between local streams and the store.
const CHUNK_SIZE: usize = 64 * 1024;

/// In-memory buffer between the caller's sink and the destination writer.
const STREAM_BUFFER_SIZE: usize = 64 * 1024;

/// Process-wide adapter handle for idempotent initialization.
static SHARED_SERVICE: OnceCell<ObjectFileService> = OnceCell::new();

/// File service adapter over a bucket-backed object store.
///
/// Stateless apart from the operator handle, which is read-only after
/// construction; concurrent calls are not serialized against each other.
#[derive(Debug)]
pub struct ObjectFileService {
    operator: Operator,
    config: StorageConfig,
}

impl ObjectFileService {
    /// Create a new adapter from configuration.
    ///
    /// All credential and provider problems surface here; there is no lazy
    /// or retry path.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential blob cannot be parsed or the
    /// storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, FileServiceError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Get or initialize the process-wide adapter.
    ///
    /// The first call constructs the storage client from `config`; later
    /// calls return the existing handle and skip re-initialization, so their
    /// config is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the first-time construction fails.
    pub fn shared(config: StorageConfig) -> Result<&'static Self, FileServiceError> {
        SHARED_SERVICE.get_or_try_init(|| Self::from_config(config))
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, FileServiceError> {
        match provider {
            StorageProvider::Gcs {
                service_account_key,
                bucket,
            } => {
                // The credential blob must be valid service-account JSON.
                serde_json::from_str::<serde_json::Value>(service_account_key).map_err(|e| {
                    FileServiceError::configuration(format!("invalid service account key: {e}"))
                })?;

                let builder = services::Gcs::default()
                    .bucket(bucket)
                    .credential(&BASE64_STANDARD.encode(service_account_key));

                Operator::new(builder)
                    .map_err(|e| FileServiceError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Operator::new(builder)
                    .map_err(|e| FileServiceError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);

                Operator::new(builder)
                    .map_err(|e| FileServiceError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| FileServiceError::configuration("invalid path"))?,
                );

                Operator::new(builder)
                    .map_err(|e| FileServiceError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
        }
    }

    /// Destination key for a public upload: `<upload_dir>/<basename>`.
    #[must_use]
    pub fn public_key(&self, original_name: &str) -> String {
        format!("{}/{}", self.config.upload_dir, basename(original_name))
    }

    /// Destination key for a protected upload:
    /// `<upload_dir>/private/<basename>`.
    #[must_use]
    pub fn protected_key(&self, original_name: &str) -> String {
        format!(
            "{}/private/{}",
            self.config.upload_dir,
            basename(original_name)
        )
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the bucket/container name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        self.config.provider.bucket()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Stream a staged local file into the object at `key`, tagging it with
    /// the content type. An existing object at the key is overwritten.
    async fn write_object(
        &self,
        key: &str,
        source_path: &Path,
        content_type: &str,
    ) -> Result<(), FileServiceError> {
        let mut source = tokio::fs::File::open(source_path).await?;
        let mut writer = self
            .open_writer(key, content_type)
            .await
            .map_err(|e| storage_error(e, key))?;

        let mut buf = BytesMut::with_capacity(CHUNK_SIZE);
        loop {
            let read = source.read_buf(&mut buf).await?;
            if read == 0 {
                break;
            }
            writer
                .write(buf.split().freeze())
                .await
                .map_err(|e| storage_error(e, key))?;
        }

        writer.close().await.map_err(|e| storage_error(e, key))?;
        Ok(())
    }

    /// Open a writer for `key`, tagging the object with the content type
    /// when the backend records one (local fs does not).
    async fn open_writer(
        &self,
        key: &str,
        content_type: &str,
    ) -> Result<opendal::Writer, opendal::Error> {
        let mut writer = self.operator.writer_with(key);
        if self
            .operator
            .info()
            .full_capability()
            .write_with_content_type
        {
            writer = writer.content_type(content_type);
        }
        writer.await
    }

    /// Long-lived signed read URL for `key`.
    ///
    /// Providers without presign support (local fs) fall back to the
    /// public-style URL so the dev provider stays usable.
    async fn signed_read_url(&self, key: &str) -> Result<String, FileServiceError> {
        let ttl = Duration::from_secs(self.config.signed_url_ttl_secs);
        match self.operator.presign_read(key, ttl).await {
            Ok(presigned) => Ok(presigned.uri().to_string()),
            Err(e) if e.kind() == ErrorKind::Unsupported => {
                Ok(self.config.provider.public_url(key))
            }
            Err(e) => Err(storage_error(e, key)),
        }
    }
}

#[async_trait]
impl FileService for ObjectFileService {
    async fn upload(&self, file: &UploadedFile) -> Result<UploadResult, FileServiceError> {
        let key = self.public_key(&file.original_name);
        self.write_object(&key, &file.path, &file.content_type)
            .await?;
        let url = self.signed_read_url(&key).await?;
        Ok(UploadResult { key, url })
    }

    async fn upload_protected(
        &self,
        file: &UploadedFile,
    ) -> Result<UploadResult, FileServiceError> {
        let key = self.protected_key(&file.original_name);
        self.write_object(&key, &file.path, &file.content_type)
            .await?;
        let url = self.signed_read_url(&key).await?;
        Ok(UploadResult { key, url })
    }

    async fn delete(&self, locator: &FileLocator) -> Result<(), FileServiceError> {
        if let Err(err) = self.operator.delete(&locator.file_key).await {
            tracing::error!(key = %locator.file_key, error = %err, "failed to delete object");
            return Err(storage_error(err, &locator.file_key));
        }
        Ok(())
    }

    async fn get_upload_stream_descriptor(
        &self,
        request: UploadStreamRequest,
    ) -> Result<UploadStreamDescriptor, FileServiceError> {
        // Millisecond timestamp keys: concurrent calls with the same name in
        // the same millisecond collide, and the store's last writer wins.
        let key = stream_key(&request.name);
        let url = self.config.provider.public_url(&key);
        let file_key = key.clone();

        let mut writer = self
            .open_writer(&key, &request.content_type)
            .await
            .map_err(|e| storage_error(e, &key))?;

        let (mut source, sink) = tokio::io::duplex(STREAM_BUFFER_SIZE);

        let completion = tokio::spawn(async move {
            let mut buf = BytesMut::with_capacity(CHUNK_SIZE);
            loop {
                let read = source.read_buf(&mut buf).await?;
                if read == 0 {
                    break;
                }
                writer
                    .write(buf.split().freeze())
                    .await
                    .map_err(|e| storage_error(e, &key))?;
            }
            writer.close().await.map_err(|e| storage_error(e, &key))?;

            // The completion result addresses the object by bare key.
            Ok(UploadResult {
                url: key.clone(),
                key,
            })
        });

        Ok(UploadStreamDescriptor {
            write_stream: sink,
            completion,
            url,
            file_key,
        })
    }

    async fn get_download_stream(
        &self,
        locator: &FileLocator,
    ) -> Result<DownloadStream, FileServiceError> {
        let key = &locator.file_key;

        // Existence check first: absent keys fail NotFound before any
        // stream is opened.
        let meta = self
            .operator
            .stat(key)
            .await
            .map_err(|e| storage_error(e, key))?;

        let reader = self
            .operator
            .reader(key)
            .await
            .map_err(|e| storage_error(e, key))?;
        let stream = reader
            .into_futures_async_read(0..meta.content_length())
            .await
            .map_err(|e| storage_error(e, key))?;

        Ok(Box::new(stream.compat()))
    }

    async fn get_presigned_download_url(
        &self,
        locator: &FileLocator,
    ) -> Result<String, FileServiceError> {
        let key = &locator.file_key;

        self.operator
            .stat(key)
            .await
            .map_err(|e| storage_error(e, key))?;

        self.signed_read_url(key).await
    }
}

/// Destination key for a streaming upload: `<millisecond timestamp>_<name>`.
fn stream_key(name: &str) -> String {
    format!("{}_{}", Utc::now().timestamp_millis(), name)
}

/// Base name of an uploaded file's original name, with any directory
/// components stripped.
fn basename(original_name: &str) -> &str {
    Path::new(original_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(original_name)
}

/// Map an OpenDAL error to the contract taxonomy, attributing not-found
/// errors to the key that was addressed.
fn storage_error(err: opendal::Error, key: &str) -> FileServiceError {
    match err.kind() {
        ErrorKind::NotFound => FileServiceError::not_found(key),
        ErrorKind::Unsupported => FileServiceError::PresignNotSupported,
        _ => FileServiceError::operation(err.to_string()),
    }
}

/// Extension trait for pipe operator.
trait Pipe: Sized {
    fn pipe<F, R>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}

impl<T> Pipe for T {}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn test_service_with_dir(upload_dir: &str) -> ObjectFileService {
        let root = std::env::temp_dir().join(format!("filebridge-prop-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&root).expect("create test root");
        let config =
            StorageConfig::new(StorageProvider::local_fs(root)).with_upload_dir(upload_dir);
        ObjectFileService::from_config(config).expect("create service")
    }

    // Property: public keys always live directly under the configured
    // prefix, protected keys under its private/ subtree.
    proptest! {
        #[test]
        fn prop_key_placement(
            upload_dir in "[a-z][a-z0-9-]{0,15}",
            name in "[a-zA-Z0-9][a-zA-Z0-9._-]{0,31}",
        ) {
            let service = test_service_with_dir(&upload_dir);

            let public = service.public_key(&name);
            let protected = service.protected_key(&name);

            prop_assert_eq!(public, format!("{upload_dir}/{name}"));
            prop_assert_eq!(protected, format!("{upload_dir}/private/{name}"));
        }
    }

    // Property: directory components never survive into a computed key.
    proptest! {
        #[test]
        fn prop_basename_strips_directories(
            dirs in prop::collection::vec("[a-zA-Z0-9.]{1,8}", 0..4),
            name in "[a-zA-Z0-9][a-zA-Z0-9._-]{0,31}",
        ) {
            let mut path = dirs.join("/");
            if !path.is_empty() {
                path.push('/');
            }
            path.push_str(&name);

            prop_assert_eq!(basename(&path), name.as_str());
        }
    }

    // Property: streaming keys are `<millisecond timestamp>_<name>`.
    proptest! {
        #[test]
        fn prop_stream_key_format(name in "[a-zA-Z0-9][a-zA-Z0-9._-]{0,31}") {
            let key = stream_key(&name);
            let (timestamp, rest) = key.split_once('_').expect("timestamped key");

            prop_assert!(timestamp.parse::<i64>().is_ok());
            prop_assert_eq!(rest, name.as_str());
        }
    }
}
