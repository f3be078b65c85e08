//! List metadata operations.

use serde::{Deserialize, Serialize};

/// The Metadata API rejects `listMetadata` calls with more queries than this.
pub const MAX_LIST_QUERIES: usize = 3;

/// One `listMetadata` query: a type, optionally scoped to a folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListMetadataQuery {
    pub metadata_type: String,
    pub folder: Option<String>,
}

impl ListMetadataQuery {
    /// Query every component of a type.
    pub fn new(metadata_type: impl Into<String>) -> Self {
        Self {
            metadata_type: metadata_type.into(),
            folder: None,
        }
    }

    /// Query the components of a type inside one folder.
    pub fn in_folder(metadata_type: impl Into<String>, folder: impl Into<String>) -> Self {
        Self {
            metadata_type: metadata_type.into(),
            folder: Some(folder.into()),
        }
    }
}

/// A metadata component from list metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataComponent {
    pub full_name: String,
    pub file_name: Option<String>,
    pub id: Option<String>,
    pub namespace_prefix: Option<String>,
    pub metadata_type: String,
    pub last_modified_by_name: Option<String>,
    pub last_modified_date: Option<String>,
    pub manageable_state: Option<String>,
}

impl MetadataComponent {
    /// A component with only a name and type tag.
    pub fn new(full_name: impl Into<String>, metadata_type: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            file_name: None,
            id: None,
            namespace_prefix: None,
            metadata_type: metadata_type.into(),
            last_modified_by_name: None,
            last_modified_date: None,
            manageable_state: None,
        }
    }
}
