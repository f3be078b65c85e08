//! Scheduled backup configuration.

use busbar_sf_archive::StorageConfig;
use busbar_sf_auth::LoginCredentials;
use busbar_sf_metadata::{PollConfig, DEFAULT_API_VERSION};

use crate::error::{Error, ErrorKind, Result};

/// Everything one scheduled backup run needs.
#[derive(Debug, Clone)]
pub struct BackupConfig {
    pub credentials: LoginCredentials,
    pub owner_id: String,
    pub org_id: String,
    pub types: Vec<String>,
    pub api_version: String,
    pub poll: PollConfig,
    pub storage: StorageConfig,
}

impl BackupConfig {
    /// Load from the environment.
    ///
    /// Reads the `SF_*` login variables, `BACKUP_OWNER_ID`, `BACKUP_ORG_ID`,
    /// `BACKUP_TYPES` (comma separated), optional `SF_API_VERSION`, the
    /// `RETRIEVE_POLL_*` overrides and the `S3_*` storage settings.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            credentials: LoginCredentials::from_env()?,
            owner_id: required("BACKUP_OWNER_ID")?,
            org_id: required("BACKUP_ORG_ID")?,
            types: parse_types(&required("BACKUP_TYPES")?)?,
            api_version: std::env::var("SF_API_VERSION")
                .unwrap_or_else(|_| DEFAULT_API_VERSION.to_string()),
            poll: PollConfig::from_env()?,
            storage: StorageConfig::from_env()?,
        })
    }
}

fn required(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(Error::new(ErrorKind::Config(format!("{name} is not set")))),
    }
}

/// Split a comma separated type list, dropping blanks.
pub(crate) fn parse_types(raw: &str) -> Result<Vec<String>> {
    let types: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    if types.is_empty() {
        return Err(Error::new(ErrorKind::Config(
            "BACKUP_TYPES names no metadata types".to_string(),
        )));
    }
    Ok(types)
}
