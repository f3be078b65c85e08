use busbar_sf_client::security::xml;
use tracing::{debug, instrument};

use super::METADATA_NS;
use crate::error::{Error, ErrorKind, Result};
use crate::list::{ListMetadataQuery, MetadataComponent, MAX_LIST_QUERIES};

impl super::MetadataClient {
    /// List metadata components for up to three queries in one call.
    ///
    /// More than [`MAX_LIST_QUERIES`] queries is rejected before any request is
    /// made; an empty query slice returns an empty listing without a request.
    #[instrument(skip(self, queries), fields(queries = queries.len()))]
    pub async fn list_metadata(
        &self,
        queries: &[ListMetadataQuery],
    ) -> Result<Vec<MetadataComponent>> {
        if queries.len() > MAX_LIST_QUERIES {
            return Err(Error::new(ErrorKind::TooManyQueries {
                count: queries.len(),
                max: MAX_LIST_QUERIES,
            }));
        }
        if queries.is_empty() {
            return Ok(Vec::new());
        }

        let queries_xml: String = queries
            .iter()
            .map(|q| {
                let folder = q
                    .folder
                    .as_deref()
                    .map(|f| format!("<folder>{}</folder>", xml::escape(f)))
                    .unwrap_or_default();
                format!(
                    "<queries>{}<type>{}</type></queries>",
                    folder,
                    xml::escape(&q.metadata_type)
                )
            })
            .collect::<Vec<_>>()
            .join("\n      ");

        let body = format!(
            r#"<listMetadata xmlns="{ns}">
      {queries}
      <asOfVersion>{api_version}</asOfVersion>
    </listMetadata>"#,
            ns = METADATA_NS,
            queries = queries_xml,
            api_version = xml::escape(&self.api_version),
        );

        let response_text = self.invoke("listMetadata", &body).await?;

        // A single query tells us the type of any component that omits it.
        let fallback_type = match queries {
            [only] => only.metadata_type.as_str(),
            _ => "",
        };
        let components = self.parse_list_metadata_result(&response_text, fallback_type);
        debug!(components = components.len(), "listMetadata returned");
        Ok(components)
    }
}
