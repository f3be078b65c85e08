//! SOAP partner-API login.

use std::future::Future;

use busbar_sf_client::security::xml;
use busbar_sf_client::{xml as extract, ClientConfig, SoapClient, DEFAULT_API_VERSION};
use tracing::{info, instrument};

use crate::credentials::{LoginCredentials, Session};
use crate::error::{Error, ErrorKind, Result};

/// Something that can turn login credentials into a live session.
///
/// Every orchestration call authenticates anew; implementations must not cache
/// sessions across calls.
pub trait SessionProvider: Send + Sync {
    /// Authenticate and return a session bound to the org's instance URL.
    fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> impl Future<Output = Result<Session>> + Send;
}

/// Username/password(+token) login against the SOAP partner API.
#[derive(Debug, Clone)]
pub struct SoapLogin {
    client: SoapClient,
    api_version: String,
    login_url: Option<String>,
}

impl SoapLogin {
    /// Create a login client with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a login client with a custom HTTP configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            client: SoapClient::new(config)?,
            api_version: DEFAULT_API_VERSION.to_string(),
            login_url: None,
        })
    }

    /// Set the API version used for the login endpoint and the session.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Override the login host instead of deriving it from the org type.
    pub fn with_login_url(mut self, login_url: impl Into<String>) -> Self {
        self.login_url = Some(login_url.into().trim_end_matches('/').to_string());
        self
    }

    fn login_endpoint(&self, credentials: &LoginCredentials) -> String {
        let host = self
            .login_url
            .as_deref()
            .unwrap_or_else(|| credentials.org_type().login_url());
        format!("{}/services/Soap/u/{}", host, self.api_version)
    }

    fn login_envelope(credentials: &LoginCredentials) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:urn="urn:partner.soap.sforce.com">
  <soapenv:Body>
    <urn:login>
      <urn:username>{username}</urn:username>
      <urn:password>{password}</urn:password>
    </urn:login>
  </soapenv:Body>
</soapenv:Envelope>"#,
            username = xml::escape(credentials.username()),
            password = xml::escape(&credentials.password_with_token()),
        )
    }

    /// Parse a login response into a session.
    pub(crate) fn parse_login_response(&self, body: &str) -> Result<Session> {
        let session_id = extract::extract_element(body, "sessionId").ok_or_else(|| {
            Error::new(ErrorKind::InvalidResponse("missing sessionId".to_string()))
        })?;
        let server_url = extract::extract_element(body, "serverUrl").ok_or_else(|| {
            Error::new(ErrorKind::InvalidResponse("missing serverUrl".to_string()))
        })?;

        let instance_url = url::Url::parse(&server_url)?
            .origin()
            .ascii_serialization();

        let mut session = Session::new(session_id, instance_url, self.api_version.clone());
        if let Some(org_id) = extract::extract_element(body, "organizationId") {
            session = session.with_organization_id(org_id);
        }
        if let Some(user_id) = extract::extract_element(body, "userId") {
            session = session.with_user_id(user_id);
        }
        Ok(session)
    }
}

impl SessionProvider for SoapLogin {
    #[instrument(skip(self, credentials), fields(org_type = %credentials.org_type()))]
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Session> {
        credentials.validate()?;

        let body = self
            .client
            .call(
                &self.login_endpoint(credentials),
                "login",
                Self::login_envelope(credentials),
            )
            .await?;

        let session = self.parse_login_response(&body)?;
        info!(
            organization_id = session.organization_id().unwrap_or("unknown"),
            "Authenticated to Salesforce"
        );
        Ok(session)
    }
}
