//! SOAP client with Salesforce fault handling.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::xml;

/// SOAP Action header name.
static SOAP_ACTION_HEADER: HeaderName = HeaderName::from_static("soapaction");

/// Longest slice of a non-fault error body kept in an error message.
const MAX_ERROR_BODY: usize = 512;

/// SOAP Fault returned by a Salesforce SOAP endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapFault {
    pub fault_code: String,
    pub fault_string: String,
}

impl SoapFault {
    /// Parse a SOAP fault from a response body, if there is one.
    pub fn parse(body: &str) -> Option<Self> {
        if !body.contains("faultcode") {
            return None;
        }

        let fault_code = xml::extract_element(body, "faultcode")?;
        let fault_string = xml::extract_element(body, "faultstring")
            .unwrap_or_else(|| "Unknown error".to_string());

        Some(SoapFault {
            fault_code,
            fault_string,
        })
    }
}

impl std::fmt::Display for SoapFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SOAP Fault: {} - {}", self.fault_code, self.fault_string)
    }
}

impl From<SoapFault> for Error {
    fn from(fault: SoapFault) -> Self {
        Error::new(ErrorKind::SoapFault {
            code: fault.fault_code,
            message: fault.fault_string,
        })
    }
}

/// HTTP client that posts SOAP envelopes to Salesforce endpoints.
///
/// Each call is a single request/response; there is no retry layer.
#[derive(Debug, Clone)]
pub struct SoapClient {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl SoapClient {
    /// Create a new SOAP client from the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self { inner, config })
    }

    /// Create a new SOAP client with default configuration.
    pub fn default_client() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Post an envelope and return the response body.
    ///
    /// A SOAP fault in the body is returned as [`ErrorKind::SoapFault`] even when
    /// the HTTP status is 500, which is how Salesforce reports faults.
    #[instrument(skip(self, envelope), fields(url = %url))]
    pub async fn call(&self, url: &str, soap_action: &str, envelope: String) -> Result<String> {
        let response = self
            .inner
            .post(url)
            .headers(Self::build_headers(soap_action)?)
            .body(envelope)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if self.config.enable_tracing {
            debug!(status = status.as_u16(), bytes = body.len(), "SOAP response received");
        }

        if let Some(fault) = SoapFault::parse(&body) {
            return Err(fault.into());
        }

        if !status.is_success() {
            let message: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(Error::new(ErrorKind::Http {
                status: status.as_u16(),
                message,
            }));
        }

        Ok(body)
    }

    /// Build common headers for SOAP requests.
    pub(crate) fn build_headers(soap_action: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/xml;charset=UTF-8"),
        );
        let action = HeaderValue::from_str(soap_action)
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;
        headers.insert(SOAP_ACTION_HEADER.clone(), action);
        Ok(headers)
    }
}
