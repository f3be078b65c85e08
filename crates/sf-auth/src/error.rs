//! Error types for sf-auth.
//!
//! Error messages are designed to avoid exposing sensitive credential data.

use busbar_sf_client::ErrorKind as ClientErrorKind;

/// Result type alias for sf-auth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sf-auth operations.
///
/// Error messages are sanitized to prevent accidental credential exposure.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if Salesforce rejected the login itself.
    pub fn is_login_rejected(&self) -> bool {
        matches!(self.kind, ErrorKind::LoginFailed { .. })
    }
}

/// The kind of error that occurred.
///
/// Error messages avoid including credential values.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Salesforce rejected the login (SOAP fault such as `INVALID_LOGIN`).
    #[error("Login failed: {code} - {message}")]
    LoginFailed { code: String, message: String },

    /// Invalid credentials configuration.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Transport error during authentication.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Login response was missing required fields.
    #[error("Invalid login response: {0}")]
    InvalidResponse(String),

    /// Environment variable not set.
    #[error("Environment variable not set: {0}")]
    EnvVar(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<busbar_sf_client::Error> for Error {
    fn from(err: busbar_sf_client::Error) -> Self {
        let kind = match &err.kind {
            ClientErrorKind::SoapFault { code, message } => ErrorKind::LoginFailed {
                code: code.clone(),
                message: message.clone(),
            },
            _ => {
                // Sanitize any potential credential exposure
                let message = err.to_string();
                if message.contains("<password>") || message.contains("sessionId") {
                    ErrorKind::Http("Client error (details redacted for security)".to_string())
                } else {
                    ErrorKind::Http(message)
                }
            }
        };
        Error::with_source(kind, err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::InvalidResponse(err.to_string()), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_display() {
        let err = ErrorKind::LoginFailed {
            code: "sf:INVALID_LOGIN".to_string(),
            message: "INVALID_LOGIN: Invalid username, password, security token; or user locked out."
                .to_string(),
        };
        assert!(err.to_string().starts_with("Login failed: sf:INVALID_LOGIN"));

        let err = ErrorKind::EnvVar("SF_USERNAME".to_string());
        assert_eq!(err.to_string(), "Environment variable not set: SF_USERNAME");
    }

    #[test]
    fn test_soap_fault_becomes_login_failed() {
        let client_err = busbar_sf_client::Error::new(ClientErrorKind::SoapFault {
            code: "sf:INVALID_LOGIN".to_string(),
            message: "bad".to_string(),
        });
        let err: Error = client_err.into();
        assert!(err.is_login_rejected());
    }

    #[test]
    fn test_transport_error_is_not_login_rejection() {
        let client_err = busbar_sf_client::Error::new(ClientErrorKind::Timeout);
        let err: Error = client_err.into();
        assert!(!err.is_login_rejected());
        assert!(matches!(err.kind, ErrorKind::Http(_)));
    }
}
