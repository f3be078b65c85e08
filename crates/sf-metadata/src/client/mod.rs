//! Metadata API client.

use busbar_sf_auth::Credentials;
use busbar_sf_client::security::xml;
use busbar_sf_client::SoapClient;

use crate::api::MetadataApi;
use crate::describe::DescribeMetadataResult;
use crate::error::Result;
use crate::list::{ListMetadataQuery, MetadataComponent};
use crate::retrieve::{PackageManifest, RetrieveResult};
use crate::types::DEFAULT_API_VERSION;

mod describe;
mod list;
mod retrieve;
mod xml_helpers;

/// Metadata API XML namespace.
pub(crate) const METADATA_NS: &str = "http://soap.sforce.com/2006/04/metadata";

/// Salesforce Metadata API client.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    instance_url: String,
    access_token: String,
    api_version: String,
    soap: SoapClient,
}

impl MetadataClient {
    /// Create a new Metadata API client from an authenticated session.
    pub fn new(credentials: &impl Credentials) -> Result<Self> {
        Ok(Self::from_parts(credentials.instance_url(), credentials.access_token())?
            .with_api_version(credentials.api_version()))
    }

    /// Create a new Metadata API client from instance URL and access token.
    pub fn from_parts(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            instance_url: instance_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            soap: SoapClient::default_client()?,
        })
    }

    /// Set the API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Use a preconfigured SOAP client (timeouts, user agent).
    pub fn with_soap_client(mut self, client: SoapClient) -> Self {
        self.soap = client;
        self
    }

    /// The API version used for calls and manifests.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Get the Metadata API SOAP endpoint URL.
    pub(crate) fn metadata_url(&self) -> String {
        format!("{}/services/Soap/m/{}", self.instance_url, self.api_version)
    }

    /// Wrap an operation body in a SOAP envelope carrying the session header.
    pub(crate) fn envelope(&self, body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:xsd="http://www.w3.org/2001/XMLSchema">
  <soap:Header>
    <SessionHeader xmlns="{ns}">
      <sessionId>{session_id}</sessionId>
    </SessionHeader>
  </soap:Header>
  <soap:Body>
    {body}
  </soap:Body>
</soap:Envelope>"#,
            ns = METADATA_NS,
            session_id = xml::escape(&self.access_token),
            body = body,
        )
    }

    /// Post an operation and return the raw response body.
    pub(crate) async fn invoke(&self, soap_action: &str, body: &str) -> Result<String> {
        let response = self
            .soap
            .call(&self.metadata_url(), soap_action, self.envelope(body))
            .await?;
        Ok(response)
    }
}

impl MetadataApi for MetadataClient {
    fn api_version(&self) -> &str {
        &self.api_version
    }

    async fn describe_metadata(&self) -> Result<DescribeMetadataResult> {
        MetadataClient::describe_metadata(self).await
    }

    async fn list_metadata(&self, queries: &[ListMetadataQuery]) -> Result<Vec<MetadataComponent>> {
        MetadataClient::list_metadata(self, queries).await
    }

    async fn retrieve_unpackaged(&self, manifest: &PackageManifest) -> Result<String> {
        MetadataClient::retrieve_unpackaged(self, manifest).await
    }

    async fn check_retrieve_status(
        &self,
        async_process_id: &str,
        include_zip: bool,
    ) -> Result<RetrieveResult> {
        MetadataClient::check_retrieve_status(self, async_process_id, include_zip).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use busbar_sf_auth::Session;

    #[test]
    fn test_client_creation() {
        let client = MetadataClient::from_parts("https://test.salesforce.com", "token123").unwrap();
        assert_eq!(client.api_version, DEFAULT_API_VERSION);
    }

    #[test]
    fn test_client_from_session() {
        let session = Session::new("00D!token", "https://na1.salesforce.com", "58.0");
        let client = MetadataClient::new(&session).unwrap();
        assert_eq!(client.api_version(), "58.0");
        assert_eq!(
            client.metadata_url(),
            "https://na1.salesforce.com/services/Soap/m/58.0"
        );
    }

    #[test]
    fn test_metadata_url_construction() {
        let client = MetadataClient::from_parts("https://na1.salesforce.com/", "token")
            .unwrap()
            .with_api_version("62.0");
        assert_eq!(
            client.metadata_url(),
            "https://na1.salesforce.com/services/Soap/m/62.0"
        );
    }

    #[test]
    fn test_envelope_carries_escaped_session() {
        let client = MetadataClient::from_parts("https://na1.salesforce.com", "00D!a&b").unwrap();
        let envelope = client.envelope("<describeMetadata/>");
        assert!(envelope.contains("<sessionId>00D!a&amp;b</sessionId>"));
        assert!(envelope.contains("<describeMetadata/>"));
    }
}
