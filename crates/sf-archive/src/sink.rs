//! Archive records, their storage keys, and the sink that writes them.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::error::{Error, ErrorKind, Result};
use crate::store::BlobStore;

/// Content type every archive is stored with.
pub const ARCHIVE_CONTENT_TYPE: &str = "archive/zip";

/// Key prefix for scheduled backups.
pub const BACKUP_PREFIX: &str = "scheduled_backup/";

const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S%.6fZ";

/// Format a backup timestamp with microseconds, e.g. `20240301T020000.000000Z`.
pub fn backup_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// A decoded archive and the identity it is filed under.
///
/// Without a timestamp the record is a migration archive, stored under the
/// owner id alone and replaced by the next migration for that owner. With a
/// timestamp it is a backup, stored under its own key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRecord {
    pub owner_id: String,
    pub org_id: Option<String>,
    pub timestamp: Option<String>,
    pub bytes: Bytes,
}

impl ArchiveRecord {
    pub fn migration(owner_id: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            owner_id: owner_id.into(),
            org_id: None,
            timestamp: None,
            bytes: bytes.into(),
        }
    }

    pub fn backup(
        owner_id: impl Into<String>,
        org_id: impl Into<String>,
        timestamp: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            org_id: Some(org_id.into()),
            timestamp: Some(timestamp.into()),
            bytes: bytes.into(),
        }
    }

    /// Decode a base64 retrieve payload into a migration record.
    pub fn migration_from_base64(owner_id: impl Into<String>, payload: &str) -> Result<Self> {
        Ok(Self::migration(owner_id, decode_payload(payload)?))
    }

    /// Decode a base64 retrieve payload into a backup record stamped with
    /// the current UTC time.
    pub fn backup_from_base64(
        owner_id: impl Into<String>,
        org_id: impl Into<String>,
        payload: &str,
    ) -> Result<Self> {
        Ok(Self::backup(
            owner_id,
            org_id,
            backup_timestamp(Utc::now()),
            decode_payload(payload)?,
        ))
    }

    pub fn is_backup(&self) -> bool {
        self.timestamp.is_some()
    }

    /// The storage key for this record.
    ///
    /// `scheduled_backup/{owner}:{org}:{timestamp}` for backups, `{owner}`
    /// otherwise. Parts containing `:` or `/` are rejected.
    pub fn key(&self) -> Result<String> {
        check_part("owner id", &self.owner_id)?;
        match &self.timestamp {
            None => Ok(self.owner_id.clone()),
            Some(timestamp) => {
                let org_id = self.org_id.as_deref().ok_or_else(|| {
                    Error::new(ErrorKind::InvalidKey(
                        "backup record has no org id".to_string(),
                    ))
                })?;
                check_part("org id", org_id)?;
                check_part("timestamp", timestamp)?;
                Ok(format!(
                    "{BACKUP_PREFIX}{}:{org_id}:{timestamp}",
                    self.owner_id
                ))
            }
        }
    }
}

fn check_part(what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::new(ErrorKind::InvalidKey(format!("{what} is empty"))));
    }
    if value.contains(':') || value.contains('/') {
        return Err(Error::new(ErrorKind::InvalidKey(format!(
            "{what} contains a key delimiter: {value}"
        ))));
    }
    Ok(())
}

/// Decode base64, ignoring the line breaks some servers wrap payloads with.
fn decode_payload(payload: &str) -> Result<Bytes> {
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(Bytes::from(STANDARD.decode(compact)?))
}

/// Writes archive records to a [`BlobStore`] and reads backups back.
#[derive(Debug)]
pub struct ArchiveSink<S> {
    blobs: S,
}

impl<S: BlobStore> ArchiveSink<S> {
    pub fn new(blobs: S) -> Self {
        Self { blobs }
    }

    pub fn blob_store(&self) -> &S {
        &self.blobs
    }

    /// Store a record and return the key it was written under.
    ///
    /// Backups never replace each other: when the derived key is already
    /// taken, `-1`, `-2`, ... is appended until a free key is found.
    #[instrument(skip(self, record), fields(owner = %record.owner_id, size = record.bytes.len()))]
    pub async fn store(&self, record: &ArchiveRecord) -> Result<String> {
        let mut key = record.key()?;
        if record.is_backup() {
            key = self.free_key(key).await?;
        }
        self.blobs
            .put(&key, record.bytes.clone(), ARCHIVE_CONTENT_TYPE)
            .await?;
        info!(key = %key, backup = record.is_backup(), "archive stored");
        Ok(key)
    }

    async fn free_key(&self, key: String) -> Result<String> {
        let taken = self.blobs.list(&key).await?;
        if !taken.contains(&key) {
            return Ok(key);
        }
        let mut n = 1usize;
        loop {
            let candidate = format!("{key}-{n}");
            if !taken.contains(&candidate) {
                return Ok(candidate);
            }
            n += 1;
        }
    }

    /// Backups of `owner_id`, as sorted `{orgId}:{timestamp}` suffixes.
    #[instrument(skip(self))]
    pub async fn list(&self, owner_id: &str) -> Result<Vec<String>> {
        check_part("owner id", owner_id)?;
        let prefix = format!("{BACKUP_PREFIX}{owner_id}:");
        let mut suffixes: Vec<String> = self
            .blobs
            .list(&prefix)
            .await?
            .into_iter()
            .filter_map(|key| key.strip_prefix(&prefix).map(str::to_string))
            .filter(|suffix| !suffix.is_empty())
            .collect();
        suffixes.sort();
        Ok(suffixes)
    }

    /// Read one backup by the suffix [`list`](Self::list) returned.
    #[instrument(skip(self))]
    pub async fn get(&self, owner_id: &str, suffix: &str) -> Result<Bytes> {
        check_part("owner id", owner_id)?;
        if suffix.is_empty() || suffix.contains('/') {
            return Err(Error::new(ErrorKind::InvalidKey(format!(
                "invalid backup suffix: {suffix:?}"
            ))));
        }
        self.blobs
            .get(&format!("{BACKUP_PREFIX}{owner_id}:{suffix}"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBlobStore;
    use chrono::TimeZone;

    #[test]
    fn test_backup_key() {
        let record = ArchiveRecord::backup("005A", "00DB", "20240301T020000Z", &b"zip"[..]);
        assert_eq!(
            record.key().unwrap(),
            "scheduled_backup/005A:00DB:20240301T020000Z"
        );
    }

    #[test]
    fn test_migration_key() {
        let record = ArchiveRecord::migration("005A", &b"zip"[..]);
        assert_eq!(record.key().unwrap(), "005A");
        assert!(!record.is_backup());
    }

    #[test]
    fn test_key_rejects_delimiters() {
        assert!(ArchiveRecord::migration("", &b""[..]).key().is_err());
        assert!(ArchiveRecord::migration("a/b", &b""[..]).key().is_err());
        assert!(ArchiveRecord::backup("005A", "00D:x", "1", &b""[..]).key().is_err());

        let mut record = ArchiveRecord::backup("005A", "00DB", "1", &b""[..]);
        record.org_id = None;
        assert!(record.key().is_err());
    }

    #[test]
    fn test_backup_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 2, 0, 0).unwrap();
        assert_eq!(backup_timestamp(at), "20240301T020000.000000Z");

        let later = at + chrono::Duration::microseconds(1500);
        assert_eq!(backup_timestamp(later), "20240301T020000.001500Z");
        assert!(backup_timestamp(at) < backup_timestamp(later));
    }

    #[test]
    fn test_decode_tolerates_line_breaks() {
        let record = ArchiveRecord::migration_from_base64("005A", "UEsD\nBA==\r\n").unwrap();
        assert_eq!(record.bytes.as_ref(), &[0x50, 0x4b, 0x03, 0x04]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = ArchiveRecord::migration_from_base64("005A", "not base64!").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Decode(_)));
    }

    #[test]
    fn test_backup_from_base64_stamps_now() {
        let record = ArchiveRecord::backup_from_base64("005A", "00DB", "UEsDBA==").unwrap();
        let timestamp = record.timestamp.as_deref().unwrap();
        assert_eq!(timestamp.len(), "20240301T020000.000000Z".len());
        assert!(timestamp.ends_with('Z'));
    }

    #[tokio::test]
    async fn test_store_uses_archive_content_type() {
        let sink = ArchiveSink::new(MemoryBlobStore::new());
        let key = sink
            .store(&ArchiveRecord::migration("005A", &b"zip"[..]))
            .await
            .unwrap();

        let object = sink.blob_store().object(&key).await.unwrap();
        assert_eq!(object.content_type, "archive/zip");
        assert_eq!(object.data.as_ref(), b"zip");
    }

    #[tokio::test]
    async fn test_list_returns_sorted_suffixes_for_owner() {
        let sink = ArchiveSink::new(MemoryBlobStore::new());
        for (owner, ts) in [
            ("005A", "20240302T020000Z"),
            ("005A", "20240301T020000Z"),
            ("005AB", "20240301T020000Z"),
        ] {
            sink.store(&ArchiveRecord::backup(owner, "00DB", ts, &b"z"[..]))
                .await
                .unwrap();
        }
        sink.store(&ArchiveRecord::migration("005A", &b"m"[..]))
            .await
            .unwrap();

        let suffixes = sink.list("005A").await.unwrap();
        assert_eq!(
            suffixes,
            vec!["00DB:20240301T020000Z", "00DB:20240302T020000Z"]
        );

        let bytes = sink.get("005A", &suffixes[1]).await.unwrap();
        assert_eq!(bytes.as_ref(), b"z");
    }

    #[tokio::test]
    async fn test_back_to_back_backups_are_both_kept() {
        let sink = ArchiveSink::new(MemoryBlobStore::new());
        let first = ArchiveRecord::backup_from_base64("005A", "00DB", "UEsDBA==").unwrap();
        let second = ArchiveRecord::backup_from_base64("005A", "00DB", "UEsDBQ==").unwrap();

        let first_key = sink.store(&first).await.unwrap();
        let second_key = sink.store(&second).await.unwrap();

        assert_ne!(first_key, second_key);
        assert_eq!(sink.list("005A").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_same_timestamp_gets_numbered_key() {
        let sink = ArchiveSink::new(MemoryBlobStore::new());
        let ts = "20240301T020000.000000Z";
        let mut keys = Vec::new();
        for body in [&b"one"[..], &b"two"[..], &b"three"[..]] {
            keys.push(
                sink.store(&ArchiveRecord::backup("005A", "00DB", ts, body))
                    .await
                    .unwrap(),
            );
        }

        assert_eq!(
            keys,
            vec![
                "scheduled_backup/005A:00DB:20240301T020000.000000Z",
                "scheduled_backup/005A:00DB:20240301T020000.000000Z-1",
                "scheduled_backup/005A:00DB:20240301T020000.000000Z-2",
            ]
        );
        let suffixes = sink.list("005A").await.unwrap();
        assert_eq!(suffixes.len(), 3);
        assert_eq!(sink.get("005A", &suffixes[0]).await.unwrap().as_ref(), b"one");
    }

    #[tokio::test]
    async fn test_migration_overwrites_previous() {
        let sink = ArchiveSink::new(MemoryBlobStore::new());
        sink.store(&ArchiveRecord::migration("005A", &b"old"[..])).await.unwrap();
        let key = sink
            .store(&ArchiveRecord::migration("005A", &b"new"[..]))
            .await
            .unwrap();

        assert_eq!(key, "005A");
        assert_eq!(sink.blob_store().len().await, 1);
    }

    #[tokio::test]
    async fn test_get_missing_backup() {
        let sink = ArchiveSink::new(MemoryBlobStore::new());
        let err = sink.get("005A", "00DB:1").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(sink.get("005A", "").await.is_err());
    }
}
