//! Run one scheduled metadata backup.
//!
//! Configuration comes from the environment (see `BackupConfig::from_env`).
//!
//! ```sh
//! export SF_USERNAME=admin@example.com SF_PASSWORD=... SF_SECURITY_TOKEN=...
//! export BACKUP_OWNER_ID=005xx0000012345 BACKUP_ORG_ID=00Dxx0000001gEF
//! export BACKUP_TYPES=CustomObject,ApexClass,Report
//! export S3_BUCKET=metadata-archives S3_ACCESS_KEY=... S3_SECRET_KEY=...
//! cargo run --bin scheduled-backup
//! ```

use std::time::Duration;

use anyhow::{bail, Context, Result};
use busbar_sf_backup::archive::S3BlobStore;
use busbar_sf_backup::auth::SoapLogin;
use busbar_sf_backup::client::ClientConfig;
use busbar_sf_backup::{BackupConfig, MetadataService, SoapConnector, StatusCode};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = BackupConfig::from_env().context("Failed to load backup configuration")?;
    info!(
        owner = %config.owner_id,
        org = %config.org_id,
        types = config.types.len(),
        "Starting scheduled backup"
    );

    // checkRetrieveStatus responses carry the whole archive
    let http = ClientConfig::builder()
        .with_timeout(Duration::from_secs(300))
        .build();

    let login = SoapLogin::with_config(http.clone())
        .context("Failed to build login client")?
        .with_api_version(config.api_version.clone());
    let service = MetadataService::new(
        login,
        SoapConnector::new()
            .with_config(http)
            .with_api_version(config.api_version.clone()),
        S3BlobStore::new(config.storage.clone()),
    );

    let response = service
        .run_backup(
            &config.credentials,
            &config.types,
            &config.owner_id,
            &config.org_id,
            &config.poll,
        )
        .await;

    println!("{}", serde_json::to_string_pretty(&response)?);

    if response.status != StatusCode::Finished {
        bail!("Backup failed with status {}", response.status);
    }
    Ok(())
}
