//! Retrieve manifests and retrieve status.

use crate::types::FileProperties;
use busbar_sf_client::security::xml;
use serde::{Deserialize, Serialize};

/// Members selected for one type in a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Members {
    /// Every component of the type (`*`).
    Wildcard,
    /// Exactly these components, possibly none.
    Named(Vec<String>),
}

impl Members {
    /// Member strings as they appear in package.xml.
    pub fn as_strings(&self) -> Vec<&str> {
        match self {
            Members::Wildcard => vec!["*"],
            Members::Named(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

impl From<Vec<String>> for Members {
    fn from(names: Vec<String>) -> Self {
        Members::Named(names)
    }
}

/// Package manifest (package.xml).
///
/// Use this structured type to safely build package manifests without
/// risk of XML injection. All values are properly escaped when converted
/// to XML.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageManifest {
    pub types: Vec<PackageTypeMembers>,
    pub version: String,
}

impl PackageManifest {
    /// Create a new package manifest with the given API version.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            types: Vec::new(),
            version: version.into(),
        }
    }

    /// Add a metadata type with its members.
    pub fn add_type(mut self, name: impl Into<String>, members: impl Into<Members>) -> Self {
        self.types.push(PackageTypeMembers {
            name: name.into(),
            members: members.into(),
        });
        self
    }

    /// Add a metadata type selecting every component (`*`).
    pub fn add_wildcard(self, name: impl Into<String>) -> Self {
        self.add_type(name, Members::Wildcard)
    }

    /// Look up the members of a type.
    pub fn members_of(&self, name: &str) -> Option<&Members> {
        self.types.iter().find(|t| t.name == name).map(|t| &t.members)
    }

    /// Type names in manifest order.
    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.name.as_str()).collect()
    }

    /// Convert to XML elements for SOAP envelope.
    /// All values are properly XML-escaped to prevent injection.
    pub(crate) fn to_xml(&self) -> String {
        let mut xml_parts = Vec::new();

        for type_member in &self.types {
            let mut lines: Vec<String> = type_member
                .members
                .as_strings()
                .into_iter()
                .map(|m| format!("<members>{}</members>", xml::escape(m)))
                .collect();
            lines.push(format!("<name>{}</name>", xml::escape(&type_member.name)));

            xml_parts.push(format!(
                "<types>\n          {}\n        </types>",
                lines.join("\n          ")
            ));
        }

        xml_parts.push(format!("<version>{}</version>", xml::escape(&self.version)));

        xml_parts.join("\n        ")
    }
}

/// Type members in a package manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageTypeMembers {
    pub name: String,
    pub members: Members,
}

/// Retrieve status as reported by `checkRetrieveStatus`.
///
/// Only the four in-flight/success strings are recognized, case-sensitively.
/// Everything else, including `Failed`, is [`RetrieveStatus::Finished`]: the job
/// is over and no archive will be produced by this status check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetrieveStatus {
    Pending,
    Queued,
    InProgress,
    Succeeded,
    Finished,
}

impl RetrieveStatus {
    /// True once no further polling can change the outcome.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RetrieveStatus::Succeeded | RetrieveStatus::Finished)
    }
}

impl From<&str> for RetrieveStatus {
    fn from(s: &str) -> Self {
        match s {
            "Pending" => RetrieveStatus::Pending,
            "Queued" => RetrieveStatus::Queued,
            "InProgress" => RetrieveStatus::InProgress,
            "Succeeded" => RetrieveStatus::Succeeded,
            _ => RetrieveStatus::Finished,
        }
    }
}

impl std::fmt::Display for RetrieveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetrieveStatus::Pending => write!(f, "Pending"),
            RetrieveStatus::Queued => write!(f, "Queued"),
            RetrieveStatus::InProgress => write!(f, "InProgress"),
            RetrieveStatus::Succeeded => write!(f, "Succeeded"),
            RetrieveStatus::Finished => write!(f, "Finished"),
        }
    }
}

/// Result of a retrieve status check.
#[derive(Debug, Clone)]
pub struct RetrieveResult {
    /// Async process ID.
    pub id: String,
    /// Whether the operation is complete.
    pub done: bool,
    /// Status string exactly as the server sent it.
    pub status_text: String,
    /// Current status.
    pub status: RetrieveStatus,
    /// Whether the retrieve succeeded.
    pub success: bool,
    /// Error message if failed.
    pub error_message: Option<String>,
    /// Error status code if failed.
    pub error_status_code: Option<String>,
    /// Base64-encoded zip file contents.
    pub zip_file: Option<String>,
    /// File properties in the retrieved package.
    pub file_properties: Vec<FileProperties>,
    /// Retrieve messages (warnings/errors).
    pub messages: Vec<RetrieveMessage>,
}

impl RetrieveResult {
    /// A bare result carrying only an id and a raw status string.
    pub fn with_status(id: impl Into<String>, status_text: impl Into<String>) -> Self {
        let status_text = status_text.into();
        let status = RetrieveStatus::from(status_text.as_str());
        Self {
            id: id.into(),
            done: status.is_terminal(),
            success: status == RetrieveStatus::Succeeded,
            status_text,
            status,
            error_message: None,
            error_status_code: None,
            zip_file: None,
            file_properties: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// Attach a base64 zip payload.
    pub fn with_zip_file(mut self, zip_file: impl Into<String>) -> Self {
        self.zip_file = Some(zip_file.into());
        self
    }
}

/// A message from retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrieveMessage {
    pub file_name: String,
    pub problem: String,
}
