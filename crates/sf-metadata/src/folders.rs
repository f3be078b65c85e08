//! Folder discovery for folder-scoped metadata types.
//!
//! EmailTemplate, Document, Report and Dashboard components live in folders,
//! so they can't be retrieved with a `*` wildcard. Their folders are listed
//! first, then the items inside each folder (see [`enumerate`](crate::enumerate)).

use std::collections::BTreeMap;

use futures::future::join_all;
use tracing::{debug, instrument, warn};

use crate::api::MetadataApi;
use crate::list::{ListMetadataQuery, MetadataComponent};

/// A metadata type whose components are organized into folders.
///
/// Variant order is the order families appear in a built manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FolderFamily {
    EmailTemplate,
    Document,
    Report,
    Dashboard,
}

impl FolderFamily {
    /// Every family, in manifest order.
    pub const ALL: [FolderFamily; 4] = [
        FolderFamily::EmailTemplate,
        FolderFamily::Document,
        FolderFamily::Report,
        FolderFamily::Dashboard,
    ];

    /// The metadata type name of the family's items.
    pub fn type_name(&self) -> &'static str {
        match self {
            FolderFamily::EmailTemplate => "EmailTemplate",
            FolderFamily::Document => "Document",
            FolderFamily::Report => "Report",
            FolderFamily::Dashboard => "Dashboard",
        }
    }

    /// The metadata type used to list the family's folders.
    pub fn folder_type(&self) -> &'static str {
        match self {
            FolderFamily::EmailTemplate => "EmailFolder",
            FolderFamily::Document => "DocumentFolder",
            FolderFamily::Report => "ReportFolder",
            FolderFamily::Dashboard => "DashboardFolder",
        }
    }

    /// Look up a family by its item type name (exact match).
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.type_name() == name)
    }
}

impl std::fmt::Display for FolderFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Map a folder-type tag to the type of the items it holds.
///
/// Returns an empty string for unrecognized tags, which makes the
/// following enumeration a no-op.
pub fn infer_child_type(folder_tag: &str) -> &'static str {
    match folder_tag {
        "EmailFolder" => "EmailTemplate",
        "DashboardFolder" => "Dashboard",
        "ReportFolder" => "Report",
        "DocumentFolder" => "Document",
        _ => "",
    }
}

/// Folders discovered for one family, plus the type of their items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderSet {
    pub names: Vec<String>,
    pub child_type: String,
}

impl FolderSet {
    /// No folders and no child type.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Normalize a folder listing.
    ///
    /// The child type comes from the first folder's type tag; an empty listing
    /// never infers a type.
    pub fn from_listing(folders: &[MetadataComponent]) -> Self {
        match folders.first() {
            None => Self::empty(),
            Some(first) => Self {
                names: folders.iter().map(|f| f.full_name.clone()).collect(),
                child_type: infer_child_type(&first.metadata_type).to_string(),
            },
        }
    }

    /// True when there is nothing to enumerate.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() || self.child_type.is_empty()
    }
}

/// List the folders of each family.
///
/// One listing call per family, issued concurrently. A failed listing is
/// logged and yields an empty set for that family only.
#[instrument(skip(api))]
pub async fn resolve_folders<A: MetadataApi>(
    api: &A,
    families: &[FolderFamily],
) -> BTreeMap<FolderFamily, FolderSet> {
    let lookups = families.iter().map(|family| async move {
        let query = [ListMetadataQuery::new(family.folder_type())];
        let set = match api.list_metadata(&query).await {
            Ok(folders) => FolderSet::from_listing(&folders),
            Err(err) => {
                warn!(family = %family, error = %err, "folder listing failed, treating as empty");
                FolderSet::empty()
            }
        };
        if !set.names.is_empty() && set.child_type.is_empty() {
            warn!(family = %family, "unrecognized folder type tag, items will not be enumerated");
        }
        debug!(family = %family, folders = set.names.len(), "folders resolved");
        (*family, set)
    });

    join_all(lookups).await.into_iter().collect()
}
