//! Job dispatcher - concurrent retrieval orchestration
//!
//! This module runs one download job per extracted reference:
//! - Spawning every job task eagerly
//! - Bounding the jobs in flight with the admission gate
//! - Isolating per-job failures from sibling jobs
//! - Waiting for every job before reporting the run outcome

use crate::config::RunConfig;
use crate::download::gate::AdmissionGate;
use crate::download::job::{DownloadJob, JobFailure, JobOutcome};
use crate::download::Fetcher;
use crate::output::{file_exists, write_file, RunOutcome, WriteStatus};
use crate::state::JobState;
use crate::url::resolve;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

/// Everything a job task needs, shared read-only by all tasks
#[derive(Debug)]
struct JobContext {
    base: Url,
    dir: PathBuf,
    overwrite: bool,
    fetcher: Fetcher,
}

/// Dispatches download jobs with bounded concurrency
pub struct Dispatcher {
    context: Arc<JobContext>,
    gate: AdmissionGate,
}

impl Dispatcher {
    /// Creates a dispatcher
    ///
    /// # Arguments
    ///
    /// * `base` - URL of the scanned page, used to resolve references
    /// * `dir` - Output directory
    /// * `overwrite` - Replace existing files instead of skipping them
    /// * `fetcher` - Fetcher shared by every job
    /// * `capacity` - Maximum number of jobs in flight
    pub fn new(
        base: Url,
        dir: PathBuf,
        overwrite: bool,
        fetcher: Fetcher,
        capacity: usize,
    ) -> Self {
        Self {
            context: Arc::new(JobContext {
                base,
                dir,
                overwrite,
                fetcher,
            }),
            gate: AdmissionGate::new(capacity),
        }
    }

    /// Creates a dispatcher from the run configuration
    pub fn from_config(config: &RunConfig, fetcher: Fetcher) -> Self {
        Self::new(
            config.base_url.clone(),
            config.dir.clone(),
            config.overwrite,
            fetcher,
            config.concurrency,
        )
    }

    /// The admission gate, exposed for inspection
    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    /// Runs one job per reference and waits for all of them
    ///
    /// Jobs are numbered from 1 in the order of `references` and queue on the
    /// gate in that order. Completion order is unspecified. This returns only
    /// after every job has reached a terminal state; a failing or panicking
    /// job never stops the others.
    pub async fn dispatch(&self, references: Vec<String>) -> RunOutcome {
        let started_at = Utc::now();
        tracing::info!(
            "Dispatching {} jobs ({} at a time)",
            references.len(),
            self.gate.capacity()
        );

        let mut handles = Vec::with_capacity(references.len());
        for (index, reference) in references.into_iter().enumerate() {
            let id = index + 1;
            let context = Arc::clone(&self.context);
            let gate = self.gate.clone();
            let job = DownloadJob::new(id, reference.clone());

            let handle = tokio::spawn(async move {
                let _permit = match gate.acquire().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        let mut job = job;
                        job.finish(JobOutcome::Failed(JobFailure::Aborted(e.to_string())));
                        return job;
                    }
                };
                run_job(&context, job).await
            });

            handles.push((id, reference, handle));
        }

        let mut jobs = Vec::with_capacity(handles.len());
        for (id, reference, handle) in handles {
            match handle.await {
                Ok(job) => jobs.push(job),
                Err(e) => {
                    tracing::error!("Job {} task did not complete: {}", id, e);
                    let mut job = DownloadJob::new(id, reference);
                    job.finish(JobOutcome::Failed(JobFailure::Aborted(e.to_string())));
                    jobs.push(job);
                }
            }
        }

        let outcome = RunOutcome::new(jobs, started_at, Utc::now());
        tracing::info!(
            "All {} jobs finished: {} done, {} skipped, {} failed",
            outcome.total(),
            outcome.done(),
            outcome.skipped(),
            outcome.failed()
        );
        outcome
    }
}

/// Runs a single job to a terminal state
async fn run_job(context: &JobContext, mut job: DownloadJob) -> DownloadJob {
    let outcome = match process_job(context, &mut job).await {
        Ok(outcome) => outcome,
        Err(failure) => {
            let target = job
                .target
                .as_ref()
                .map(|url| url.to_string())
                .unwrap_or_else(|| format!("'{}'", job.reference));
            tracing::warn!("Job {} failed for {}: {}", job.id, target, failure);
            JobOutcome::Failed(failure)
        }
    };

    job.finish(outcome);
    job
}

/// Moves a job to the next state of its lifecycle
fn step(job: &mut DownloadJob, next: JobState) -> Result<(), JobFailure> {
    job.advance(next).map_err(|e| JobFailure::Aborted(e.to_string()))
}

/// Resolves, fetches and writes one asset
async fn process_job(
    context: &JobContext,
    job: &mut DownloadJob,
) -> Result<JobOutcome, JobFailure> {
    step(job, JobState::Resolving)?;
    tracing::debug!("Job {}: parsing asset string '{}'", job.id, job.reference);

    let target = resolve(&context.base, &job.reference)?;
    job.target = Some(target.url.clone());

    if target.degenerate {
        return Err(JobFailure::DegenerateTarget);
    }

    let path = context.dir.join(target.require_file_name()?);
    job.path = Some(path.clone());

    if !context.overwrite && file_exists(&path).await {
        tracing::info!("Skipping existing file {} ({})", path.display(), target.url);
        return Ok(JobOutcome::Skipped);
    }

    step(job, JobState::Fetching)?;
    tracing::debug!("Job {}: downloading file '{}'", job.id, target.url);
    let bytes = context.fetcher.fetch(&target.url).await?;

    step(job, JobState::Writing)?;
    tracing::debug!("Job {}: writing file '{}'", job.id, path.display());
    match write_file(&path, &bytes, context.overwrite).await? {
        WriteStatus::Written(bytes) => Ok(JobOutcome::Done { bytes }),
        WriteStatus::Skipped => {
            tracing::info!("Skipping existing file {} ({})", path.display(), target.url);
            Ok(JobOutcome::Skipped)
        }
    }
}
