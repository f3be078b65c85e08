//! Error types for the orchestration layer.
//!
//! Service operations report outcomes as [`Response`](crate::Response) codes;
//! this error covers configuration, wiring, and backup listing/download.

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

    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("Transport error: {0}")]
    Client(String),
    #[error("Metadata error: {0}")]
    Metadata(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<busbar_sf_auth::Error> for Error {
    fn from(err: busbar_sf_auth::Error) -> Self {
        Error::with_source(ErrorKind::Auth(err.kind.to_string()), err)
    }
}

impl From<busbar_sf_client::Error> for Error {
    fn from(err: busbar_sf_client::Error) -> Self {
        Error::with_source(ErrorKind::Client(err.kind.to_string()), err)
    }
}

impl From<busbar_sf_metadata::Error> for Error {
    fn from(err: busbar_sf_metadata::Error) -> Self {
        Error::with_source(ErrorKind::Metadata(err.kind.to_string()), err)
    }
}

impl From<busbar_sf_archive::Error> for Error {
    fn from(err: busbar_sf_archive::Error) -> Self {
        Error::with_source(ErrorKind::Storage(err.kind.to_string()), err)
    }
}
