//! Storage configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Storage provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// Google Cloud Storage, authenticated with a service-account key.
    Gcs {
        /// Service-account key JSON, as issued by the cloud console.
        service_account_key: String,
        /// GCS bucket name.
        bucket: String,
    },
    /// S3-compatible storage: Cloudflare R2, Supabase, AWS S3, DigitalOcean Spaces
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// AWS access key ID.
        access_key_id: String,
        /// AWS secret access key.
        secret_access_key: String,
        /// AWS region.
        region: String,
    },
    /// Azure Blob Storage
    AzureBlob {
        /// Azure storage account name.
        account: String,
        /// Azure storage access key.
        access_key: String,
        /// Azure container name.
        container: String,
    },
    /// Local filesystem (development only)
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
}

impl StorageProvider {
    /// Create a Google Cloud Storage provider.
    #[must_use]
    pub fn gcs(service_account_key: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self::Gcs {
            service_account_key: service_account_key.into(),
            bucket: bucket.into(),
        }
    }

    /// Create an S3-compatible provider (Cloudflare R2, Supabase, AWS S3).
    #[must_use]
    pub fn s3(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self::S3 {
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
        }
    }

    /// Create an Azure Blob Storage provider.
    #[must_use]
    pub fn azure_blob(
        account: impl Into<String>,
        access_key: impl Into<String>,
        container: impl Into<String>,
    ) -> Self {
        Self::AzureBlob {
            account: account.into(),
            access_key: access_key.into(),
            container: container.into(),
        }
    }

    /// Create a local filesystem provider (development only).
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Get the provider name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gcs { .. } => "gcs",
            Self::S3 { .. } => "s3",
            Self::AzureBlob { .. } => "azure_blob",
            Self::LocalFs { .. } => "local",
        }
    }

    /// Get the bucket/container name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        match self {
            Self::Gcs { bucket, .. } | Self::S3 { bucket, .. } => bucket,
            Self::AzureBlob { container, .. } => container,
            Self::LocalFs { root } => root.to_str().unwrap_or("local"),
        }
    }

    /// Build the public-style URL for a key, from bucket name and key alone.
    ///
    /// This URL says nothing about reachability: the object behind it is
    /// only readable if it is also public by bucket policy.
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        match self {
            Self::Gcs { bucket, .. } => {
                format!("https://storage.googleapis.com/{bucket}/{key}")
            }
            Self::S3 {
                endpoint, bucket, ..
            } => {
                format!("{}/{bucket}/{key}", endpoint.trim_end_matches('/'))
            }
            Self::AzureBlob {
                account, container, ..
            } => {
                format!("https://{account}.blob.core.windows.net/{container}/{key}")
            }
            Self::LocalFs { root } => format!("{}/{key}", root.display()),
        }
    }
}

/// Object storage adapter configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Logical path prefix under which all managed objects are placed.
    pub upload_dir: String,
    /// Signed read URL TTL in seconds. Defaults to an effectively
    /// non-expiring horizon.
    pub signed_url_ttl_secs: u64,
}

impl StorageConfig {
    /// Default upload prefix.
    pub const DEFAULT_UPLOAD_DIR: &'static str = "uploads";
    /// Default signed URL TTL: roughly 400 years.
    pub const DEFAULT_SIGNED_URL_TTL: u64 = 400 * 365 * 24 * 60 * 60;

    /// Create a new storage config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            upload_dir: Self::DEFAULT_UPLOAD_DIR.to_string(),
            signed_url_ttl_secs: Self::DEFAULT_SIGNED_URL_TTL,
        }
    }

    /// Set the upload prefix.
    #[must_use]
    pub fn with_upload_dir(mut self, dir: impl Into<String>) -> Self {
        self.upload_dir = dir.into();
        self
    }

    /// Set the signed URL TTL.
    #[must_use]
    pub fn with_signed_url_ttl(mut self, secs: u64) -> Self {
        self.signed_url_ttl_secs = secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_provider_gcs() {
        let provider = StorageProvider::gcs(r#"{"type":"service_account"}"#, "app-files");
        assert_eq!(provider.name(), "gcs");
        assert_eq!(provider.bucket(), "app-files");
        assert_eq!(
            provider.public_url("uploads/photo.png"),
            "https://storage.googleapis.com/app-files/uploads/photo.png"
        );
    }

    #[test]
    fn test_storage_provider_s3() {
        let provider = StorageProvider::s3(
            "https://account.r2.cloudflarestorage.com/",
            "app-files",
            "access_key",
            "secret_key",
            "auto",
        );
        assert_eq!(provider.name(), "s3");
        assert_eq!(provider.bucket(), "app-files");
        assert_eq!(
            provider.public_url("uploads/photo.png"),
            "https://account.r2.cloudflarestorage.com/app-files/uploads/photo.png"
        );
    }

    #[test]
    fn test_storage_provider_azure() {
        let provider = StorageProvider::azure_blob("appdev", "access_key", "app-files");
        assert_eq!(provider.name(), "azure_blob");
        assert_eq!(provider.bucket(), "app-files");
        assert_eq!(
            provider.public_url("uploads/photo.png"),
            "https://appdev.blob.core.windows.net/app-files/uploads/photo.png"
        );
    }

    #[test]
    fn test_storage_provider_local() {
        let provider = StorageProvider::local_fs("./storage");
        assert_eq!(provider.name(), "local");
    }

    #[test]
    fn test_storage_config_defaults() {
        let config = StorageConfig::new(StorageProvider::local_fs("./storage"));
        assert_eq!(config.upload_dir, StorageConfig::DEFAULT_UPLOAD_DIR);
        assert_eq!(
            config.signed_url_ttl_secs,
            StorageConfig::DEFAULT_SIGNED_URL_TTL
        );
    }

    #[test]
    fn test_storage_config_builders() {
        let config = StorageConfig::new(StorageProvider::local_fs("./storage"))
            .with_upload_dir("media")
            .with_signed_url_ttl(3600);
        assert_eq!(config.upload_dir, "media");
        assert_eq!(config.signed_url_ttl_secs, 3600);
    }

    #[test]
    fn test_provider_config_deserializes_tagged() {
        let json = r#"{
            "type": "gcs",
            "service_account_key": "{\"type\":\"service_account\"}",
            "bucket": "app-files"
        }"#;
        let provider: StorageProvider = serde_json::from_str(json).expect("deserialize");
        assert_eq!(provider.name(), "gcs");
    }
}
