use busbar_sf_client::xml;

use crate::describe::{DescribeMetadataResult, MetadataType};
use crate::error::{Error, ErrorKind, Result};
use crate::list::MetadataComponent;
use crate::retrieve::{RetrieveMessage, RetrieveResult, RetrieveStatus};
use crate::types::FileProperties;

impl super::MetadataClient {
    /// Extract a simple element value from XML.
    pub(crate) fn extract_element(&self, body: &str, tag: &str) -> Option<String> {
        xml::extract_element(body, tag)
    }

    /// Parse retrieve result from XML.
    ///
    /// `fileProperties` and `messages` carry their own `id`/`fileName`
    /// elements, so top-level fields are read with those blocks removed.
    pub(crate) fn parse_retrieve_result(&self, body: &str) -> Result<RetrieveResult> {
        let top_level = xml::strip_blocks(&xml::strip_blocks(body, "fileProperties"), "messages");

        let id = xml::extract_element(&top_level, "id")
            .ok_or_else(|| Error::new(ErrorKind::InvalidResponse("Missing id".to_string())))?;

        let status_text = xml::extract_element(&top_level, "status")
            .unwrap_or_else(|| "Pending".to_string());
        let status = RetrieveStatus::from(status_text.as_str());

        Ok(RetrieveResult {
            id,
            done: xml::extract_bool(&top_level, "done"),
            status_text,
            status,
            success: xml::extract_bool(&top_level, "success"),
            error_message: xml::extract_element(&top_level, "errorMessage"),
            error_status_code: xml::extract_element(&top_level, "errorStatusCode"),
            zip_file: xml::extract_element(&top_level, "zipFile"),
            file_properties: self.parse_file_properties(body),
            messages: self.parse_retrieve_messages(body),
        })
    }

    /// Parse file properties from retrieve result.
    pub(crate) fn parse_file_properties(&self, body: &str) -> Vec<FileProperties> {
        xml::blocks(body, "fileProperties")
            .into_iter()
            .filter_map(|block| {
                let (file_name, full_name) = (
                    xml::extract_element(block, "fileName")?,
                    xml::extract_element(block, "fullName")?,
                );
                Some(FileProperties {
                    file_name,
                    full_name,
                    id: xml::extract_element(block, "id").unwrap_or_default(),
                    component_type: xml::extract_element(block, "type").unwrap_or_default(),
                    last_modified_by_name: xml::extract_element(block, "lastModifiedByName"),
                    last_modified_date: xml::extract_element(block, "lastModifiedDate"),
                    namespace_prefix: xml::extract_element(block, "namespacePrefix"),
                })
            })
            .collect()
    }

    /// Parse retrieve messages from XML.
    pub(crate) fn parse_retrieve_messages(&self, body: &str) -> Vec<RetrieveMessage> {
        xml::blocks(body, "messages")
            .into_iter()
            .filter_map(|block| {
                Some(RetrieveMessage {
                    file_name: xml::extract_element(block, "fileName")?,
                    problem: xml::extract_element(block, "problem")?,
                })
            })
            .collect()
    }

    /// Parse list metadata result.
    ///
    /// No `<result>` elements means an empty listing. Components without a
    /// `type` element get `fallback_type`.
    pub(crate) fn parse_list_metadata_result(
        &self,
        body: &str,
        fallback_type: &str,
    ) -> Vec<MetadataComponent> {
        xml::blocks(body, "result")
            .into_iter()
            .filter_map(|block| {
                let full_name = xml::extract_element(block, "fullName")?;
                Some(MetadataComponent {
                    full_name,
                    file_name: xml::extract_element(block, "fileName"),
                    id: xml::extract_element(block, "id"),
                    namespace_prefix: xml::extract_element(block, "namespacePrefix"),
                    metadata_type: xml::extract_element(block, "type")
                        .unwrap_or_else(|| fallback_type.to_string()),
                    last_modified_by_name: xml::extract_element(block, "lastModifiedByName"),
                    last_modified_date: xml::extract_element(block, "lastModifiedDate"),
                    manageable_state: xml::extract_element(block, "manageableState"),
                })
            })
            .collect()
    }

    /// Parse describe metadata result.
    pub(crate) fn parse_describe_metadata_result(
        &self,
        body: &str,
    ) -> Result<DescribeMetadataResult> {
        if !body.contains("describeMetadataResponse") {
            return Err(Error::new(ErrorKind::InvalidResponse(
                "Missing describeMetadataResponse".to_string(),
            )));
        }

        let metadata_objects = xml::blocks(body, "metadataObjects")
            .into_iter()
            .filter_map(|block| {
                Some(MetadataType {
                    xml_name: xml::extract_element(block, "xmlName")?,
                    directory_name: xml::extract_element(block, "directoryName"),
                    suffix: xml::extract_element(block, "suffix"),
                    in_folder: xml::extract_bool(block, "inFolder"),
                    meta_file: xml::extract_bool(block, "metaFile"),
                    child_xml_names: xml::extract_elements(block, "childXmlNames"),
                })
            })
            .collect();

        let top_level = xml::strip_blocks(body, "metadataObjects");
        let organization_namespace = xml::extract_element(&top_level, "organizationNamespace")
            .filter(|ns| !ns.is_empty());

        Ok(DescribeMetadataResult {
            metadata_objects,
            organization_namespace,
            partial_save_allowed: xml::extract_bool(&top_level, "partialSaveAllowed"),
            test_required: xml::extract_bool(&top_level, "testRequired"),
        })
    }
}
