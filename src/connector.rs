//! Builds a Metadata API handle for an authenticated session.

use busbar_sf_auth::Session;
use busbar_sf_client::{ClientConfig, SoapClient};
use busbar_sf_metadata::{MetadataApi, MetadataClient};

use crate::error::Result;

/// Turns a session into a [`MetadataApi`].
///
/// The service calls this once per operation, right after logging in.
pub trait MetadataConnector: Send + Sync {
    type Api: MetadataApi;

    fn connect(&self, session: &Session) -> Result<Self::Api>;
}

/// Connects over SOAP with [`MetadataClient`].
#[derive(Debug, Clone, Default)]
pub struct SoapConnector {
    config: ClientConfig,
    api_version: Option<String>,
}

impl SoapConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// HTTP settings for every client this connector builds.
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the session's API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }
}

impl MetadataConnector for SoapConnector {
    type Api = MetadataClient;

    fn connect(&self, session: &Session) -> Result<MetadataClient> {
        let soap = SoapClient::new(self.config.clone())?;
        let mut client = MetadataClient::new(session)?.with_soap_client(soap);
        if let Some(version) = &self.api_version {
            client = client.with_api_version(version.clone());
        }
        Ok(client)
    }
}
