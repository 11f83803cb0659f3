//! Object storage file service adapter built on Apache OpenDAL.
//!
//! This crate implements the [`filebridge_contract::FileService`] capability
//! over a remote bucket-backed object store. Google Cloud Storage is the
//! reference provider; S3-compatible stores, Azure Blob, and the local
//! filesystem are supported through the same vendor-agnostic surface.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                  FileService (capability trait)                   │
//! │ upload / upload_protected / delete / get_upload_stream_descriptor│
//! │        / get_download_stream / get_presigned_download_url        │
//! ├──────────────────────────────────────────────────────────────────┤
//! │                       Apache OpenDAL                              │
//! │ op.writer_with(key)        │ op.presign_read(key, ttl)           │
//! │ op.reader(key)             │ op.stat(key)                        │
//! │ op.delete(key)             │                                     │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use service::ObjectFileService;
