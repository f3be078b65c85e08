//! Enumerate the items inside a family's folders.

use tracing::{debug, instrument, warn};

use crate::api::MetadataApi;
use crate::folders::FolderSet;
use crate::list::{ListMetadataQuery, MAX_LIST_QUERIES};

/// List the full names of every item in `folders`.
///
/// Folders are batched into listing calls of at most [`MAX_LIST_QUERIES`]
/// queries, issued one after another. A failed batch is logged and skipped;
/// items from the other batches are still returned, in listing order.
#[instrument(skip(api, folders), fields(child_type = %folders.child_type, folders = folders.names.len()))]
pub async fn enumerate<A: MetadataApi>(api: &A, folders: &FolderSet) -> Vec<String> {
    if folders.is_empty() {
        return Vec::new();
    }

    let mut items = Vec::new();
    for (index, chunk) in folders.names.chunks(MAX_LIST_QUERIES).enumerate() {
        let queries: Vec<ListMetadataQuery> = chunk
            .iter()
            .map(|folder| ListMetadataQuery::in_folder(folders.child_type.as_str(), folder.as_str()))
            .collect();

        match api.list_metadata(&queries).await {
            Ok(components) => {
                debug!(batch = index, found = components.len(), "folder batch listed");
                items.extend(components.into_iter().map(|c| c.full_name));
            }
            Err(err) => {
                warn!(batch = index, folders = ?chunk, error = %err, "folder batch listing failed, skipping");
            }
        }
    }
    items
}
