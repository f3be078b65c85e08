use busbar_sf_client::security::xml;
use tracing::instrument;

use super::METADATA_NS;
use crate::describe::DescribeMetadataResult;
use crate::error::{Error, ErrorKind, Result};

impl super::MetadataClient {
    /// Describe all available metadata types.
    ///
    /// Every failure is reported as [`ErrorKind::Describe`], with the
    /// underlying error kept as the source.
    #[instrument(skip(self))]
    pub async fn describe_metadata(&self) -> Result<DescribeMetadataResult> {
        self.try_describe_metadata().await.map_err(|err| Error {
            kind: ErrorKind::Describe(err.kind.to_string()),
            source: Some(Box::new(err)),
        })
    }

    async fn try_describe_metadata(&self) -> Result<DescribeMetadataResult> {
        let body = format!(
            r#"<describeMetadata xmlns="{ns}">
      <asOfVersion>{api_version}</asOfVersion>
    </describeMetadata>"#,
            ns = METADATA_NS,
            api_version = xml::escape(&self.api_version),
        );

        let response_text = self.invoke("describeMetadata", &body).await?;
        self.parse_describe_metadata_result(&response_text)
    }
}
