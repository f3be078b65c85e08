//! # busbar-sf-metadata
//!
//! Salesforce Metadata API retrieval pipeline.
//!
//! ## Features
//!
//! - **Describe Metadata** - Get available metadata types
//! - **List Metadata** - List components, at most three queries per call
//! - **Folder Discovery** - Resolve the folders of folder-scoped types
//!   (EmailTemplate, Document, Report, Dashboard) and enumerate their items
//! - **Manifest Building** - Wildcard direct types plus enumerated folder types
//! - **Retrieve Jobs** - Submit, poll once, or poll with a caller-supplied policy
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_sf_metadata::{ManifestBuilder, MetadataClient, PollConfig, RetrievalJobController};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), busbar_sf_metadata::Error> {
//!     let client = MetadataClient::new(&session)?;
//!
//!     let manifest = ManifestBuilder::new()
//!         .build(&client, &["CustomObject".to_string(), "Report".to_string()])
//!         .await?;
//!
//!     let jobs = RetrievalJobController::new(&client);
//!     let job_id = jobs.submit(&manifest).await?;
//!     let job = jobs.poll_until_terminal(&job_id, &PollConfig::default()).await?;
//!
//!     println!("Retrieve finished: {:?}", job.state);
//!     Ok(())
//! }
//! ```

mod api;
mod client;
mod describe;
mod enumerate;
mod error;
mod folders;
mod job;
mod list;
mod manifest;
mod retrieve;
mod types;

#[cfg(test)]
mod testing;

pub use api::MetadataApi;
pub use client::MetadataClient;
pub use describe::{DescribeMetadataResult, MetadataType};
pub use enumerate::enumerate;
pub use error::{Error, ErrorKind, Result};
pub use folders::{infer_child_type, resolve_folders, FolderFamily, FolderSet};
pub use job::{PollConfig, RetrievalJob, RetrievalJobController};
pub use list::{ListMetadataQuery, MetadataComponent, MAX_LIST_QUERIES};
pub use manifest::{FolderProbe, ManifestBuilder};
pub use retrieve::{
    Members, PackageManifest, PackageTypeMembers, RetrieveMessage, RetrieveResult, RetrieveStatus,
};
pub use types::{FileProperties, DEFAULT_API_VERSION};
