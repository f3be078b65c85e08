//! Common types for Metadata API.

use serde::{Deserialize, Serialize};

/// Default Metadata API version.
pub use busbar_sf_client::DEFAULT_API_VERSION;

/// Properties of a file in a retrieve result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileProperties {
    pub file_name: String,
    pub full_name: String,
    pub id: String,
    pub component_type: String,
    pub last_modified_by_name: Option<String>,
    pub last_modified_date: Option<String>,
    pub namespace_prefix: Option<String>,
}
