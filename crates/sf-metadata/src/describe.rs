//! Describe metadata operations.

use serde::{Deserialize, Serialize};

/// Result of describe metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescribeMetadataResult {
    pub metadata_objects: Vec<MetadataType>,
    pub organization_namespace: Option<String>,
    pub partial_save_allowed: bool,
    pub test_required: bool,
}

impl DescribeMetadataResult {
    /// Names of the types whose members live in folders.
    pub fn folder_type_names(&self) -> Vec<&str> {
        self.metadata_objects
            .iter()
            .filter(|t| t.in_folder)
            .map(|t| t.xml_name.as_str())
            .collect()
    }
}

/// A metadata type definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataType {
    pub xml_name: String,
    pub directory_name: Option<String>,
    pub suffix: Option<String>,
    pub meta_file: bool,
    pub in_folder: bool,
    pub child_xml_names: Vec<String>,
}
