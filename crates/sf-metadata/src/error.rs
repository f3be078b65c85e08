//! Error types for sf-metadata.

use busbar_sf_client::ErrorKind as ClientErrorKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    pub fn with_source(kind: ErrorKind, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self { kind, source: Some(Box::new(source)) }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("Client error: {0}")]
    Client(String),
    #[error("Auth error: {0}")]
    Auth(String),
    #[error("SOAP fault: {code} - {message}")]
    SoapFault { code: String, message: String },
    #[error("Describe error: {0}")]
    Describe(String),
    #[error("Retrieve submission failed: {0}")]
    Submit(String),
    #[error("No metadata types selected")]
    EmptySelection,
    #[error("listMetadata accepts at most {max} queries per call, got {count}")]
    TooManyQueries { count: usize, max: usize },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Timeout")]
    Timeout,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Retrieve still running after {attempts} status checks")]
    PollExhausted { attempts: u32 },
    #[error("{0}")]
    Other(String),
}

impl From<busbar_sf_client::Error> for Error {
    fn from(err: busbar_sf_client::Error) -> Self {
        let kind = match &err.kind {
            ClientErrorKind::SoapFault { code, message } => ErrorKind::SoapFault {
                code: code.clone(),
                message: message.clone(),
            },
            ClientErrorKind::Timeout => ErrorKind::Timeout,
            _ => ErrorKind::Client(err.to_string()),
        };
        Error { kind, source: Some(Box::new(err)) }
    }
}

impl From<busbar_sf_auth::Error> for Error {
    fn from(err: busbar_sf_auth::Error) -> Self {
        Error { kind: ErrorKind::Auth(err.to_string()), source: Some(Box::new(err)) }
    }
}
