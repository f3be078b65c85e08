//! Build a retrieve manifest from a caller's type selection.

use std::collections::HashSet;

use tracing::{debug, info, instrument};

use crate::api::MetadataApi;
use crate::enumerate::enumerate;
use crate::error::{Error, ErrorKind, Result};
use crate::folders::{resolve_folders, FolderFamily};
use crate::retrieve::{Members, PackageManifest};

/// Which folder families a manifest build discovers and reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FolderProbe {
    /// Probe all four families on every build, requested or not.
    #[default]
    AllFamilies,
    /// Probe only the families named in the selection.
    RequestedOnly,
}

/// Combines wildcard-selected direct types with enumerated folder types.
///
/// Manifests carry the API version of the connection they are built
/// against unless one is pinned with [`with_api_version`](Self::with_api_version).
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    api_version: Option<String>,
    probe: FolderProbe,
}

impl Default for ManifestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self {
            api_version: None,
            probe: FolderProbe::default(),
        }
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    pub fn with_probe(mut self, probe: FolderProbe) -> Self {
        self.probe = probe;
        self
    }

    /// Build the manifest for `requested`.
    ///
    /// Direct types come first, in caller order, each with a `*` member.
    /// Folder families follow in EmailTemplate, Document, Report, Dashboard
    /// order, each listing the items discovered in its folders (possibly none).
    /// Duplicate and blank names are dropped. An empty selection fails with
    /// [`ErrorKind::EmptySelection`] before any remote call.
    #[instrument(skip(self, api), fields(probe = ?self.probe))]
    pub async fn build<A: MetadataApi>(
        &self,
        api: &A,
        requested: &[String],
    ) -> Result<PackageManifest> {
        let mut seen = HashSet::new();
        let selection: Vec<&str> = requested
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty() && seen.insert(*name))
            .collect();

        if selection.is_empty() {
            return Err(Error::new(ErrorKind::EmptySelection));
        }

        let version = self.api_version.as_deref().unwrap_or_else(|| api.api_version());
        let mut manifest = PackageManifest::new(version);
        let mut requested_families = Vec::new();
        for name in &selection {
            match FolderFamily::from_type_name(name) {
                Some(family) => requested_families.push(family),
                None => manifest = manifest.add_wildcard(*name),
            }
        }

        let families: Vec<FolderFamily> = match self.probe {
            FolderProbe::AllFamilies => FolderFamily::ALL.to_vec(),
            FolderProbe::RequestedOnly => FolderFamily::ALL
                .into_iter()
                .filter(|f| requested_families.contains(f))
                .collect(),
        };

        let folder_sets = resolve_folders(api, &families).await;
        for family in families {
            let items = match folder_sets.get(&family) {
                Some(set) => enumerate(api, set).await,
                None => Vec::new(),
            };
            debug!(family = %family, items = items.len(), "folder family enumerated");
            manifest = manifest.add_type(family.type_name(), Members::Named(items));
        }

        info!(types = manifest.types.len(), "manifest built");
        Ok(manifest)
    }
}
