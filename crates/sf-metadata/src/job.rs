//! Retrieve job lifecycle: submit, poll, and caller-composed poll loops.

use std::time::Duration;

use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, instrument, warn};

use crate::api::MetadataApi;
use crate::error::{Error, ErrorKind, Result};
use crate::retrieve::{PackageManifest, RetrieveStatus};

/// Snapshot of a retrieve job after one status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalJob {
    pub id: String,
    pub state: RetrieveStatus,
    /// Base64 archive, present once the job has succeeded.
    pub zip_file: Option<String>,
    /// Remote error text, kept when a status check failed or reported one.
    pub diagnostic: Option<String>,
}

impl RetrievalJob {
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn is_succeeded(&self) -> bool {
        self.state == RetrieveStatus::Succeeded
    }
}

/// Poll loop policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between status checks.
    pub interval: Duration,
    /// Status checks before giving up.
    pub max_attempts: u32,
    /// Overall time budget for the loop.
    pub deadline: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 120,
            deadline: Duration::from_secs(600),
        }
    }
}

impl PollConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Read overrides from the environment.
    ///
    /// `RETRIEVE_POLL_INTERVAL_SECS`, `RETRIEVE_POLL_MAX_ATTEMPTS` and
    /// `RETRIEVE_POLL_DEADLINE_SECS`; unset variables keep the defaults.
    /// A max attempts of 0 is rejected.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(secs) = number(&lookup, "RETRIEVE_POLL_INTERVAL_SECS")? {
            config.interval = Duration::from_secs(secs);
        }
        if let Some(attempts) = number(&lookup, "RETRIEVE_POLL_MAX_ATTEMPTS")? {
            config.max_attempts = u32::try_from(attempts)
                .ok()
                .filter(|attempts| *attempts > 0)
                .ok_or_else(|| {
                    Error::new(ErrorKind::Config(format!(
                        "RETRIEVE_POLL_MAX_ATTEMPTS must be between 1 and {}, got {attempts}",
                        u32::MAX
                    )))
                })?;
        }
        if let Some(secs) = number(&lookup, "RETRIEVE_POLL_DEADLINE_SECS")? {
            config.deadline = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

fn number(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<u64>> {
    match lookup(name) {
        Some(value) => value.trim().parse::<u64>().map(Some).map_err(|_| {
            Error::new(ErrorKind::Config(format!("{name} must be a whole number, got {value:?}")))
        }),
        None => Ok(None),
    }
}

/// Submits retrieve jobs and checks on them.
#[derive(Debug)]
pub struct RetrievalJobController<'a, A> {
    api: &'a A,
}

impl<'a, A: MetadataApi> RetrievalJobController<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Start a retrieve for `manifest` and return the job id.
    #[instrument(skip(self, manifest), fields(types = manifest.types.len()))]
    pub async fn submit(&self, manifest: &PackageManifest) -> Result<String> {
        match self.api.retrieve_unpackaged(manifest).await {
            Ok(id) => {
                info!(job_id = %id, "retrieve submitted");
                Ok(id)
            }
            Err(err) => Err(Error {
                kind: ErrorKind::Submit(err.kind.to_string()),
                source: Some(Box::new(err)),
            }),
        }
    }

    /// Check a job once.
    ///
    /// Never fails. A failed status check, like any unrecognized status,
    /// reports the job as [`RetrieveStatus::Finished`]: the server drops
    /// status records for completed jobs, so a late check can error even
    /// though the retrieve went through.
    #[instrument(skip(self))]
    pub async fn poll(&self, job_id: &str) -> RetrievalJob {
        match self.api.check_retrieve_status(job_id, true).await {
            Ok(result) => {
                let diagnostic = result.error_message.clone().or_else(|| {
                    (result.status == RetrieveStatus::Finished
                        && !result.status_text.is_empty()
                        && result.status_text != "Finished")
                        .then(|| format!("retrieve reported status {}", result.status_text))
                });
                debug!(status = %result.status_text, "retrieve status checked");
                RetrievalJob {
                    id: job_id.to_string(),
                    state: result.status,
                    zip_file: result.zip_file,
                    diagnostic,
                }
            }
            Err(err) => {
                warn!(error = %err, "status check failed, treating retrieve as finished");
                RetrievalJob {
                    id: job_id.to_string(),
                    state: RetrieveStatus::Finished,
                    zip_file: None,
                    diagnostic: Some(err.to_string()),
                }
            }
        }
    }

    /// Poll until the job is terminal, following `config`.
    ///
    /// Fails with [`ErrorKind::PollExhausted`] when every attempt saw the job
    /// still running, or [`ErrorKind::Timeout`] when the deadline passes first.
    #[instrument(skip(self, config))]
    pub async fn poll_until_terminal(
        &self,
        job_id: &str,
        config: &PollConfig,
    ) -> Result<RetrievalJob> {
        let started = Instant::now();
        let attempts = config.max_attempts;
        let run = async {
            for attempt in 1..=attempts {
                let job = self.poll(job_id).await;
                if job.is_terminal() {
                    info!(attempt, state = %job.state, "retrieve reached terminal state");
                    return Ok(job);
                }
                debug!(attempt, state = %job.state, "retrieve still running");
                if attempt < attempts {
                    sleep(config.interval).await;
                }
            }
            Err(Error::new(ErrorKind::PollExhausted { attempts }))
        };

        match timeout(config.deadline, run).await {
            Ok(result) => result,
            Err(_) => {
                warn!(elapsed = ?started.elapsed(), "retrieve poll deadline exceeded");
                Err(Error::new(ErrorKind::Timeout))
            }
        }
    }
}
