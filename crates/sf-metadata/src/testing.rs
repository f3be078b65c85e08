//! In-memory `MetadataApi` that records every call.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use busbar_sf_client::ErrorKind as ClientErrorKind;

use crate::api::MetadataApi;
use crate::describe::DescribeMetadataResult;
use crate::error::{Error, ErrorKind, Result};
use crate::list::{ListMetadataQuery, MetadataComponent, MAX_LIST_QUERIES};
use crate::retrieve::{PackageManifest, RetrieveResult};

fn fault(message: &str) -> Error {
    busbar_sf_client::Error::new(ClientErrorKind::SoapFault {
        code: "sf:UNKNOWN_EXCEPTION".to_string(),
        message: message.to_string(),
    })
    .into()
}

#[derive(Default)]
pub(crate) struct FakeMetadataApi {
    /// Folder listings keyed by folder type (e.g. `ReportFolder`).
    folders: HashMap<String, Vec<MetadataComponent>>,
    /// Items keyed by (child type, folder name).
    items: HashMap<(String, String), Vec<String>>,
    failing_folder_types: HashSet<String>,
    failing_folders: HashSet<String>,
    submit_fault: Option<String>,
    api_version: Option<String>,
    statuses: Mutex<VecDeque<Result<RetrieveResult>>>,
    pub list_calls: Mutex<Vec<Vec<ListMetadataQuery>>>,
    pub submitted: Mutex<Vec<PackageManifest>>,
    pub status_checks: Mutex<usize>,
}

impl FakeMetadataApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register folders of a folder type, each tagged with `tag`.
    pub fn with_folders(mut self, folder_type: &str, tag: &str, names: &[&str]) -> Self {
        self.folders.insert(
            folder_type.to_string(),
            names.iter().map(|n| MetadataComponent::new(*n, tag)).collect(),
        );
        self
    }

    pub fn with_items(mut self, child_type: &str, folder: &str, names: &[&str]) -> Self {
        self.items.insert(
            (child_type.to_string(), folder.to_string()),
            names.iter().map(|n| n.to_string()).collect(),
        );
        self
    }

    pub fn failing_folder_type(mut self, folder_type: &str) -> Self {
        self.failing_folder_types.insert(folder_type.to_string());
        self
    }

    /// Any batch containing this folder fails.
    pub fn failing_folder(mut self, folder: &str) -> Self {
        self.failing_folders.insert(folder.to_string());
        self
    }

    pub fn with_submit_fault(mut self, message: &str) -> Self {
        self.submit_fault = Some(message.to_string());
        self
    }

    pub fn with_api_version(mut self, version: &str) -> Self {
        self.api_version = Some(version.to_string());
        self
    }

    pub fn with_status(self, status: Result<RetrieveResult>) -> Self {
        self.statuses.lock().unwrap().push_back(status);
        self
    }

    pub fn list_call_count(&self) -> usize {
        self.list_calls.lock().unwrap().len()
    }

    pub fn fault(message: &str) -> Error {
        fault(message)
    }
}

impl MetadataApi for FakeMetadataApi {
    fn api_version(&self) -> &str {
        self.api_version.as_deref().unwrap_or(crate::DEFAULT_API_VERSION)
    }

    async fn describe_metadata(&self) -> Result<DescribeMetadataResult> {
        Ok(DescribeMetadataResult {
            metadata_objects: Vec::new(),
            organization_namespace: None,
            partial_save_allowed: true,
            test_required: false,
        })
    }

    async fn list_metadata(&self, queries: &[ListMetadataQuery]) -> Result<Vec<MetadataComponent>> {
        self.list_calls.lock().unwrap().push(queries.to_vec());

        if queries.len() > MAX_LIST_QUERIES {
            return Err(Error::new(ErrorKind::TooManyQueries {
                count: queries.len(),
                max: MAX_LIST_QUERIES,
            }));
        }

        let mut out = Vec::new();
        for query in queries {
            match &query.folder {
                None => {
                    if self.failing_folder_types.contains(&query.metadata_type) {
                        return Err(fault("folder listing failed"));
                    }
                    out.extend(
                        self.folders
                            .get(&query.metadata_type)
                            .cloned()
                            .unwrap_or_default(),
                    );
                }
                Some(folder) => {
                    if self.failing_folders.contains(folder) {
                        return Err(fault("item listing failed"));
                    }
                    let key = (query.metadata_type.clone(), folder.clone());
                    out.extend(
                        self.items
                            .get(&key)
                            .into_iter()
                            .flatten()
                            .map(|n| MetadataComponent::new(n.clone(), query.metadata_type.clone())),
                    );
                }
            }
        }
        Ok(out)
    }

    async fn retrieve_unpackaged(&self, manifest: &PackageManifest) -> Result<String> {
        if let Some(message) = &self.submit_fault {
            return Err(fault(message));
        }
        self.submitted.lock().unwrap().push(manifest.clone());
        Ok("09S1234".to_string())
    }

    async fn check_retrieve_status(
        &self,
        async_process_id: &str,
        _include_zip: bool,
    ) -> Result<RetrieveResult> {
        *self.status_checks.lock().unwrap() += 1;
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(fault(&format!("no status queued for {async_process_id}"))))
    }
}
