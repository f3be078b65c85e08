//! # busbar-sf-archive
//!
//! Storage for retrieved metadata archives.
//!
//! A retrieve job hands back its archive as a base64 zip. [`ArchiveRecord`]
//! decodes it, and [`ArchiveSink`] stores it under a key derived from the
//! owner (and, for scheduled backups, the org and a timestamp) in any
//! [`BlobStore`]: S3-compatible storage via [`S3BlobStore`] or the in-memory
//! [`MemoryBlobStore`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_sf_archive::{ArchiveRecord, ArchiveSink, S3BlobStore, StorageConfig};
//!
//! let store = S3BlobStore::new(StorageConfig::from_env()?);
//! let sink = ArchiveSink::new(store);
//!
//! let record = ArchiveRecord::backup_from_base64("005xx", "00Dxx", &zip_file)?;
//! let key = sink.store(&record).await?;
//! ```

mod config;
mod error;
mod s3;
mod sink;
mod store;

pub use config::StorageConfig;
pub use error::{Error, ErrorKind, Result};
pub use s3::S3BlobStore;
pub use sink::{
    backup_timestamp, ArchiveRecord, ArchiveSink, ARCHIVE_CONTENT_TYPE, BACKUP_PREFIX,
};
pub use store::{BlobStore, MemoryBlobStore};
