//! # busbar-sf-backup
//!
//! Retrieve Salesforce metadata and keep the archives in blob storage.
//!
//! [`MetadataService`] ties the pieces together: it logs in, builds a
//! retrieve manifest (wildcard direct types plus the items discovered in
//! EmailTemplate, Document, Report and Dashboard folders), submits the
//! retrieve, reports its progress, and stores the finished archive either as
//! a migration artifact or as a timestamped backup. Every operation answers
//! with a [`Response`] carrying one of a fixed set of status codes.
//!
//! ## Security
//!
//! - Passwords, security tokens and session ids are redacted in Debug output
//! - Tracing skips credential parameters
//! - Responses never carry session ids
//!
//! ## Crates
//!
//! - **busbar-sf-client** - SOAP transport, fault detection, XML helpers
//! - **busbar-sf-auth** - Username/password login, org types, sessions
//! - **busbar-sf-metadata** - Folder discovery, manifests, retrieve jobs
//! - **busbar-sf-archive** - Archive records, keys, S3 and in-memory stores
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use busbar_sf_backup::{ArchiveTarget, MetadataService, SoapConnector};
//! use busbar_sf_backup::archive::{S3BlobStore, StorageConfig};
//! use busbar_sf_backup::auth::{LoginCredentials, SoapLogin};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = MetadataService::new(
//!         SoapLogin::new()?,
//!         SoapConnector::new(),
//!         S3BlobStore::new(StorageConfig::from_env()?),
//!     );
//!     let creds = LoginCredentials::from_env()?;
//!
//!     let pulled = service
//!         .pull_metadata(&creds, &["CustomObject".to_string(), "Report".to_string()])
//!         .await;
//!     let job_id = pulled.job_id.clone().unwrap_or_default();
//!
//!     let target = ArchiveTarget::Migration { owner_id: "005xx0000012345".to_string() };
//!     let status = service.check_pull_status(&creds, &job_id, Some(&target)).await;
//!     println!("{}", serde_json::to_string(&status)?);
//!     Ok(())
//! }
//! ```

mod config;
mod connector;
mod error;
mod response;
mod service;

// Re-export all crates for convenient access
pub use busbar_sf_archive as archive;
pub use busbar_sf_auth as auth;
pub use busbar_sf_client as client;
pub use busbar_sf_metadata as metadata;

pub use config::BackupConfig;
pub use connector::{MetadataConnector, SoapConnector};
pub use error::{Error, ErrorKind, Result};
pub use response::{Response, StatusCode};
pub use service::{ArchiveTarget, MetadataService};
