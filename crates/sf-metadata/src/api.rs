//! The remote Metadata API surface the retrieval pipeline depends on.

use std::future::Future;

use crate::describe::DescribeMetadataResult;
use crate::error::Result;
use crate::list::{ListMetadataQuery, MetadataComponent};
use crate::retrieve::{PackageManifest, RetrieveResult};
use crate::types::DEFAULT_API_VERSION;

/// Metadata API operations used by folder discovery, enumeration and retrieve jobs.
///
/// [`MetadataClient`](crate::MetadataClient) is the SOAP implementation.
pub trait MetadataApi: Send + Sync {
    /// API version requests are made against. Manifests default to it.
    fn api_version(&self) -> &str {
        DEFAULT_API_VERSION
    }

    /// Describe all available metadata types.
    fn describe_metadata(&self) -> impl Future<Output = Result<DescribeMetadataResult>> + Send;

    /// List components for up to [`MAX_LIST_QUERIES`](crate::MAX_LIST_QUERIES) queries.
    ///
    /// An empty listing is an empty vector, never an error.
    fn list_metadata(
        &self,
        queries: &[ListMetadataQuery],
    ) -> impl Future<Output = Result<Vec<MetadataComponent>>> + Send;

    /// Start an unpackaged retrieve and return the async process id.
    fn retrieve_unpackaged(
        &self,
        manifest: &PackageManifest,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Check the status of a retrieve once.
    fn check_retrieve_status(
        &self,
        async_process_id: &str,
        include_zip: bool,
    ) -> impl Future<Output = Result<RetrieveResult>> + Send;
}
