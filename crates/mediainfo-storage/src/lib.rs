//! MediaInfo AME Storage Library
//!
//! This crate provides the storage abstraction the worker writes artifacts
//! through, with implementations for S3 and the local filesystem, and the
//! derivation of artifact keys from input media URLs.
//!
//! # Artifact key format
//!
//! `{prefix}{YYYY-MM-DDTHH-MM-SS}/{file stem}.json`, where the file stem is the
//! last path segment of the input URL without its extension. Derivation lives
//! in the `keys` module so every caller produces the same layout.
//!
//! Keys must not contain `..` segments or start with `/`.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{derive_artifact_key, derive_artifact_key_at, KeyError};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use mediainfo_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
