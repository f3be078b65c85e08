//! The orchestration service: login, describe, pull, status and backups.

use bytes::Bytes;
use tracing::{error, info, instrument, warn};

use busbar_sf_archive::{ArchiveRecord, ArchiveSink, BlobStore};
use busbar_sf_auth::{Credentials, LoginCredentials, Session, SessionProvider};
use busbar_sf_metadata::{
    ManifestBuilder, MetadataApi, PollConfig, RetrievalJob, RetrievalJobController,
    RetrieveStatus,
};

use crate::connector::MetadataConnector;
use crate::error::Result;
use crate::response::Response;

/// Where a finished retrieve's archive goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveTarget {
    /// Stored under the owner id, replacing the previous migration archive.
    Migration { owner_id: String },
    /// Stored as a new timestamped backup.
    Backup { owner_id: String, org_id: String },
}

impl ArchiveTarget {
    fn record(&self, payload: &str) -> busbar_sf_archive::Result<ArchiveRecord> {
        match self {
            ArchiveTarget::Migration { owner_id } => {
                ArchiveRecord::migration_from_base64(owner_id.as_str(), payload)
            }
            ArchiveTarget::Backup { owner_id, org_id } => {
                ArchiveRecord::backup_from_base64(owner_id.as_str(), org_id.as_str(), payload)
            }
        }
    }
}

/// Runs metadata retrieval operations end to end.
///
/// Every operation logs in anew with the credentials it is given and
/// answers with a [`Response`]; nothing is cached between calls.
pub struct MetadataService<P, C, S> {
    sessions: P,
    connector: C,
    archives: ArchiveSink<S>,
    manifests: ManifestBuilder,
}

impl<P, C, S> MetadataService<P, C, S>
where
    P: SessionProvider,
    C: MetadataConnector,
    S: BlobStore,
{
    pub fn new(sessions: P, connector: C, store: S) -> Self {
        Self {
            sessions,
            connector,
            archives: ArchiveSink::new(store),
            manifests: ManifestBuilder::new(),
        }
    }

    /// Use a custom manifest builder (API version, folder probe).
    pub fn with_manifest_builder(mut self, manifests: ManifestBuilder) -> Self {
        self.manifests = manifests;
        self
    }

    pub fn archive_sink(&self) -> &ArchiveSink<S> {
        &self.archives
    }

    async fn login(&self, credentials: &LoginCredentials) -> std::result::Result<Session, Response> {
        self.sessions.authenticate(credentials).await.map_err(|err| {
            warn!(error = %err, "login failed");
            Response::bad_login(err.to_string())
        })
    }

    /// Log in and connect, or the response explaining why not.
    ///
    /// A connection failure answers with `on_connect_error`'s response.
    async fn open(
        &self,
        credentials: &LoginCredentials,
        on_connect_error: fn(String) -> Response,
    ) -> std::result::Result<(Session, C::Api), Response> {
        let session = self.login(credentials).await?;
        match self.connector.connect(&session) {
            Ok(api) => Ok((session, api)),
            Err(err) => {
                error!(error = %err, "could not build metadata client");
                Err(on_connect_error(err.to_string()))
            }
        }
    }

    /// 900 when the credentials log in, 100 otherwise.
    #[instrument(skip(self, credentials), fields(user = credentials.username()))]
    pub async fn check_credentials(&self, credentials: &LoginCredentials) -> Response {
        match self.login(credentials).await {
            Ok(_) => Response::logged_in(),
            Err(response) => response,
        }
    }

    /// 200 with the org's metadata types, 500 on a describe failure, 100 on
    /// a bad login.
    #[instrument(skip(self, credentials), fields(user = credentials.username()))]
    pub async fn describe_metadata(&self, credentials: &LoginCredentials) -> Response {
        let (session, api) = match self
            .open(credentials, |e| Response::describe_error(e))
            .await
        {
            Ok(opened) => opened,
            Err(response) => return response,
        };

        match api.describe_metadata().await {
            Ok(described) => {
                info!(
                    organization_id = session.organization_id().unwrap_or("unknown"),
                    types = described.metadata_objects.len(),
                    "metadata described"
                );
                Response::described(described)
            }
            Err(err) => {
                warn!(error = %err, "describe failed");
                Response::describe_error(err.to_string())
            }
        }
    }

    /// Build a manifest for `types` and submit a retrieve.
    ///
    /// 300 with the job id and instance URL, 400 for an empty selection
    /// (checked before logging in) or a rejected submission, 100 on a bad
    /// login.
    #[instrument(skip(self, credentials), fields(user = credentials.username()))]
    pub async fn pull_metadata(&self, credentials: &LoginCredentials, types: &[String]) -> Response {
        if types.iter().all(|t| t.trim().is_empty()) {
            return Response::pull_error("Error: No Metadata types selected.");
        }

        let (session, api) = match self.open(credentials, |e| Response::pull_error(e)).await {
            Ok(opened) => opened,
            Err(response) => return response,
        };

        match self.submit(&api, types).await {
            Ok(job_id) => Response::submitted(job_id, session.instance_url()),
            Err(err) => Response::pull_error(err.to_string()),
        }
    }

    async fn submit(&self, api: &C::Api, types: &[String]) -> busbar_sf_metadata::Result<String> {
        let manifest = self.manifests.build(api, types).await?;
        RetrievalJobController::new(api).submit(&manifest).await
    }

    /// Check a retrieve once.
    ///
    /// 700 while pending, queued or in progress. 600 once finished; a failed
    /// status check also counts as finished, with the failure in `error`.
    /// When the job has succeeded and a `target` is given, the archive is
    /// stored there. Storage problems are logged and never change the 600.
    #[instrument(skip(self, credentials, target), fields(user = credentials.username()))]
    pub async fn check_pull_status(
        &self,
        credentials: &LoginCredentials,
        job_id: &str,
        target: Option<&ArchiveTarget>,
    ) -> Response {
        let (_session, api) = match self.open(credentials, |e| Response::pull_error(e)).await {
            Ok(opened) => opened,
            Err(response) => return response,
        };

        let job = RetrievalJobController::new(&api).poll(job_id).await;
        match job.state {
            RetrieveStatus::Pending | RetrieveStatus::Queued | RetrieveStatus::InProgress => {
                Response::in_flight(job.state).with_job_id(job_id)
            }
            RetrieveStatus::Succeeded => {
                let response = Response::finished().with_job_id(job_id);
                match target {
                    Some(target) => self.archive(&job, target, response).await,
                    None => response,
                }
            }
            RetrieveStatus::Finished => {
                let response = Response::finished().with_job_id(job_id);
                match job.diagnostic {
                    Some(diagnostic) => response.with_error(diagnostic),
                    None => response,
                }
            }
        }
    }

    /// Store a succeeded job's archive, attaching the key to `response`.
    async fn archive(&self, job: &RetrievalJob, target: &ArchiveTarget, response: Response) -> Response {
        let Some(payload) = job.zip_file.as_deref() else {
            warn!(job_id = %job.id, "retrieve succeeded without an archive payload");
            return response.with_error("retrieve succeeded without an archive payload");
        };

        let stored = match target.record(payload) {
            Ok(record) => self.archives.store(&record).await,
            Err(err) => Err(err),
        };
        match stored {
            Ok(key) => response.with_key(key),
            Err(err) => {
                warn!(job_id = %job.id, error = %err, "archive not stored");
                response.with_error(format!("archive not stored: {err}"))
            }
        }
    }

    /// Pull `types`, poll until done, and store the archive as a backup.
    ///
    /// 600 with the stored key on success. 400 when the manifest or
    /// submission fails, polling gives up, or the job ends without an
    /// archive; 100 on a bad login.
    #[instrument(skip(self, credentials, poll), fields(user = credentials.username()))]
    pub async fn run_backup(
        &self,
        credentials: &LoginCredentials,
        types: &[String],
        owner_id: &str,
        org_id: &str,
        poll: &PollConfig,
    ) -> Response {
        if types.iter().all(|t| t.trim().is_empty()) {
            return Response::pull_error("Error: No Metadata types selected.");
        }

        let (_session, api) = match self.open(credentials, |e| Response::pull_error(e)).await {
            Ok(opened) => opened,
            Err(response) => return response,
        };

        let job_id = match self.submit(&api, types).await {
            Ok(job_id) => job_id,
            Err(err) => return Response::pull_error(err.to_string()),
        };

        let job = match RetrievalJobController::new(&api)
            .poll_until_terminal(&job_id, poll)
            .await
        {
            Ok(job) => job,
            Err(err) => {
                warn!(job_id = %job_id, error = %err, "backup retrieve did not finish");
                return Response::pull_error(err.to_string()).with_job_id(job_id);
            }
        };

        if !job.is_succeeded() {
            let diagnostic = job
                .diagnostic
                .clone()
                .unwrap_or_else(|| "retrieve finished without an archive".to_string());
            return Response::pull_error(diagnostic).with_job_id(job_id);
        }

        let target = ArchiveTarget::Backup {
            owner_id: owner_id.to_string(),
            org_id: org_id.to_string(),
        };
        self.archive(&job, &target, Response::finished().with_job_id(job_id))
            .await
    }

    /// Backups stored for `owner_id`, as sorted `{orgId}:{timestamp}` suffixes.
    pub async fn list_backups(&self, owner_id: &str) -> Result<Vec<String>> {
        Ok(self.archives.list(owner_id).await?)
    }

    /// One backup's archive bytes.
    pub async fn get_backup(&self, owner_id: &str, suffix: &str) -> Result<Bytes> {
        Ok(self.archives.get(owner_id, suffix).await?)
    }
}
