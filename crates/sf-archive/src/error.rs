//! Error types for sf-archive.

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

    /// True when the key does not exist in the store.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("Upload failed for {key}: {message}")]
    Upload { key: String, message: String },
    #[error("Listing failed for prefix {prefix}: {message}")]
    List { prefix: String, message: String },
    #[error("Download failed for {key}: {message}")]
    Download { key: String, message: String },
    #[error("Archive not found: {0}")]
    NotFound(String),
    #[error("Archive payload is not valid base64: {0}")]
    Decode(String),
    #[error("Invalid archive key part: {0}")]
    InvalidKey(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::with_source(ErrorKind::Decode(err.to_string()), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found() {
        let err = Error::new(ErrorKind::NotFound("scheduled_backup/005:00D:1".to_string()));
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "Archive not found: scheduled_backup/005:00D:1"
        );
    }
}
