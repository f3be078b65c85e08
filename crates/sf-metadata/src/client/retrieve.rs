use busbar_sf_client::security::xml;
use tracing::{debug, instrument};

use super::METADATA_NS;
use crate::error::{Error, ErrorKind, Result};
use crate::retrieve::{PackageManifest, RetrieveResult};

impl super::MetadataClient {
    /// Start a retrieve operation for unpackaged metadata.
    ///
    /// Use a `PackageManifest` to safely specify what to retrieve.
    /// All values are properly XML-escaped to prevent injection attacks.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use busbar_sf_metadata::{MetadataClient, PackageManifest};
    ///
    /// let manifest = PackageManifest::new("62.0")
    ///     .add_wildcard("ApexClass")
    ///     .add_type("Report", vec!["Sales/Pipeline".to_string()]);
    ///
    /// let async_id = client.retrieve_unpackaged(&manifest).await?;
    /// ```
    #[instrument(skip(self, manifest), fields(types = manifest.types.len()))]
    pub async fn retrieve_unpackaged(&self, manifest: &PackageManifest) -> Result<String> {
        let body = format!(
            r#"<retrieve xmlns="{ns}">
      <retrieveRequest>
        <apiVersion>{api_version}</apiVersion>
        <singlePackage>true</singlePackage>
        <unpackaged>
        {package_xml}
        </unpackaged>
      </retrieveRequest>
    </retrieve>"#,
            ns = METADATA_NS,
            api_version = xml::escape(&manifest.version),
            package_xml = manifest.to_xml(),
        );

        let response_text = self.invoke("retrieve", &body).await?;

        let id = self.extract_element(&response_text, "id").ok_or_else(|| {
            Error::new(ErrorKind::InvalidResponse(
                "No async process ID in retrieve response".to_string(),
            ))
        })?;
        debug!(async_process_id = %id, "retrieve accepted");
        Ok(id)
    }

    /// Check the status of a retrieve operation.
    #[instrument(skip(self))]
    pub async fn check_retrieve_status(
        &self,
        async_process_id: &str,
        include_zip: bool,
    ) -> Result<RetrieveResult> {
        let body = format!(
            r#"<checkRetrieveStatus xmlns="{ns}">
      <asyncProcessId>{process_id}</asyncProcessId>
      <includeZip>{include_zip}</includeZip>
    </checkRetrieveStatus>"#,
            ns = METADATA_NS,
            process_id = xml::escape(async_process_id),
            include_zip = include_zip,
        );

        let response_text = self.invoke("checkRetrieveStatus", &body).await?;
        self.parse_retrieve_result(&response_text)
    }
}
