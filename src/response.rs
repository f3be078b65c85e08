//! Caller-visible responses.
//!
//! Every service operation answers with a [`Response`] built fresh for that
//! call, carrying one of a fixed set of status codes.

use busbar_sf_metadata::{DescribeMetadataResult, RetrieveStatus};
use serde::{Serialize, Serializer};

/// The fixed response vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// 100: authentication failed.
    BadLogin,
    /// 200: metadata type descriptions retrieved.
    Described,
    /// 300: retrieve submitted, job id returned.
    Submitted,
    /// 400: retrieve submission or polling error.
    PullError,
    /// 500: metadata type description error.
    DescribeError,
    /// 600: retrieve finished.
    Finished,
    /// 700: retrieve still running.
    InProgress,
    /// 900: credentials accepted.
    LoggedIn,
}

impl StatusCode {
    pub fn code(&self) -> u16 {
        match self {
            StatusCode::BadLogin => 100,
            StatusCode::Described => 200,
            StatusCode::Submitted => 300,
            StatusCode::PullError => 400,
            StatusCode::DescribeError => 500,
            StatusCode::Finished => 600,
            StatusCode::InProgress => 700,
            StatusCode::LoggedIn => 900,
        }
    }

    /// Default message for the code.
    pub fn message(&self) -> &'static str {
        match self {
            StatusCode::BadLogin => {
                "Bad login, check your user information and organization type."
            }
            StatusCode::Described => {
                "Successfully retrieved Metadata descriptions from organization."
            }
            StatusCode::Submitted => "Successfully retrieved selected Metadata from organization.",
            StatusCode::PullError => "Error pulling Metadata from organization.",
            StatusCode::DescribeError => "Error getting Metadata descriptions from organization.",
            StatusCode::Finished => "Finished retrieving Metadata.",
            StatusCode::InProgress => "Retrieve is in progress...",
            StatusCode::LoggedIn => "Successfully logged in to organization.",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            StatusCode::BadLogin | StatusCode::PullError | StatusCode::DescribeError
        )
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for StatusCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One operation's outcome.
///
/// Serializes with the code as a string under `statuscode`; optional fields
/// are omitted when unset.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    #[serde(rename = "statuscode")]
    pub status: StatusCode,
    pub message: String,
    /// Diagnostic text from the underlying failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "pullid", skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(rename = "instanceUrl", skip_serializing_if = "Option::is_none")]
    pub instance_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DescribeMetadataResult>,
    /// Storage key of an archive written by this call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            message: status.message().to_string(),
            error: None,
            job_id: None,
            instance_url: None,
            metadata: None,
            key: None,
        }
    }

    pub fn bad_login(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BadLogin).with_error(error)
    }

    pub fn logged_in() -> Self {
        Self::new(StatusCode::LoggedIn)
    }

    pub fn described(metadata: DescribeMetadataResult) -> Self {
        Self {
            metadata: Some(metadata),
            ..Self::new(StatusCode::Described)
        }
    }

    pub fn describe_error(error: impl Into<String>) -> Self {
        Self::new(StatusCode::DescribeError).with_error(error)
    }

    pub fn submitted(job_id: impl Into<String>, instance_url: impl Into<String>) -> Self {
        Self {
            job_id: Some(job_id.into()),
            instance_url: Some(instance_url.into()),
            ..Self::new(StatusCode::Submitted)
        }
    }

    pub fn pull_error(error: impl Into<String>) -> Self {
        Self::new(StatusCode::PullError).with_error(error)
    }

    pub fn finished() -> Self {
        Self::new(StatusCode::Finished)
    }

    /// 700 with a message naming the in-flight state.
    pub fn in_flight(state: RetrieveStatus) -> Self {
        let message = match state {
            RetrieveStatus::Queued => "Retrieve is in queue...",
            RetrieveStatus::Pending => "Retrieve is in pending...",
            _ => "Retrieve is in progress...",
        };
        Self {
            message: message.to_string(),
            ..Self::new(StatusCode::InProgress)
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_job_id(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = Some(job_id.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn code(&self) -> u16 {
        self.status.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let codes: Vec<u16> = [
            StatusCode::BadLogin,
            StatusCode::Described,
            StatusCode::Submitted,
            StatusCode::PullError,
            StatusCode::DescribeError,
            StatusCode::Finished,
            StatusCode::InProgress,
            StatusCode::LoggedIn,
        ]
        .iter()
        .map(StatusCode::code)
        .collect();
        assert_eq!(codes, vec![100, 200, 300, 400, 500, 600, 700, 900]);
    }

    #[test]
    fn test_statuscode_serializes_as_string() {
        let json = serde_json::to_value(Response::finished()).unwrap();
        assert_eq!(json["statuscode"], "600");
        assert_eq!(json["message"], "Finished retrieving Metadata.");
        assert!(json.get("error").is_none());
        assert!(json.get("pullid").is_none());
    }

    #[test]
    fn test_submitted_fields() {
        let json =
            serde_json::to_value(Response::submitted("09S1234", "https://na1.salesforce.com"))
                .unwrap();
        assert_eq!(json["statuscode"], "300");
        assert_eq!(json["pullid"], "09S1234");
        assert_eq!(json["instanceUrl"], "https://na1.salesforce.com");
    }

    #[test]
    fn test_in_flight_messages() {
        assert_eq!(
            Response::in_flight(RetrieveStatus::InProgress).message,
            "Retrieve is in progress..."
        );
        assert_eq!(
            Response::in_flight(RetrieveStatus::Queued).message,
            "Retrieve is in queue..."
        );
        assert_eq!(
            Response::in_flight(RetrieveStatus::Pending).message,
            "Retrieve is in pending..."
        );
        assert_eq!(Response::in_flight(RetrieveStatus::Queued).code(), 700);
    }

    #[test]
    fn test_responses_are_independent() {
        let first = Response::bad_login("INVALID_LOGIN");
        let second = Response::new(StatusCode::BadLogin);
        assert_eq!(first.error.as_deref(), Some("INVALID_LOGIN"));
        assert!(second.error.is_none());
        assert!(StatusCode::BadLogin.is_error());
        assert!(!StatusCode::InProgress.is_error());
    }
}
