//! File service contract for Filebridge.
//!
//! This crate defines the pluggable file service seam the host application
//! programs against: the [`FileService`] capability trait, the value shapes
//! it exchanges, and the shared [`FileServiceError`] type. Concrete storage
//! adapters (object stores, local disk) live in sibling crates and are
//! selected by the host's dependency-injection wiring at configuration time.
//!
//! # Modules
//!
//! - `error` - Error taxonomy shared by all adapters
//! - `service` - The `FileService` capability trait
//! - `types` - Upload/download value shapes

pub mod error;
pub mod service;
pub mod types;

pub use error::FileServiceError;
pub use service::FileService;
pub use types::{
    DownloadStream, FileLocator, UploadResult, UploadStreamDescriptor, UploadStreamRequest,
    UploadedFile,
};
