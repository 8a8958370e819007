//! Run outcome aggregation and reporting
//!
//! This module collects the terminal state of every job of a run and prints
//! the end-of-run summary.

use crate::download::{DownloadJob, JobFailure, JobOutcome};
use crate::state::JobState;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Aggregate result of a dispatched run
#[derive(Debug)]
pub struct RunOutcome {
    /// Every job, ordered by id
    pub jobs: Vec<DownloadJob>,

    /// When dispatch began
    pub started_at: DateTime<Utc>,

    /// When the last job reached a terminal state
    pub finished_at: DateTime<Utc>,
}

impl RunOutcome {
    /// Builds an outcome, ordering jobs by id
    pub fn new(
        mut jobs: Vec<DownloadJob>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        jobs.sort_by_key(|job| job.id);
        Self {
            jobs,
            started_at,
            finished_at,
        }
    }

    /// Total number of jobs
    pub fn total(&self) -> usize {
        self.jobs.len()
    }

    /// Number of jobs in the given terminal state
    pub fn count(&self, state: JobState) -> usize {
        self.jobs.iter().filter(|job| job.state == state).count()
    }

    /// Number of assets downloaded and written
    pub fn done(&self) -> usize {
        self.count(JobState::Done)
    }

    /// Number of assets left untouched because they already existed
    pub fn skipped(&self) -> usize {
        self.count(JobState::Skipped)
    }

    /// Number of failed jobs
    pub fn failed(&self) -> usize {
        self.count(JobState::Failed)
    }

    /// Returns true when every job reached a terminal state
    pub fn is_complete(&self) -> bool {
        self.jobs.iter().all(DownloadJob::is_finished)
    }

    /// Returns true when no job failed
    pub fn is_clean(&self) -> bool {
        self.failed() == 0
    }

    /// Failed jobs with their failure, ordered by id
    pub fn failures(&self) -> impl Iterator<Item = (&DownloadJob, &JobFailure)> {
        self.jobs
            .iter()
            .filter_map(|job| job.failure().map(|failure| (job, failure)))
    }

    /// Failure counts grouped by failure kind
    pub fn failures_by_kind(&self) -> HashMap<&'static str, usize> {
        let mut counts = HashMap::new();
        for (_, failure) in self.failures() {
            *counts.entry(failure.kind()).or_insert(0) += 1;
        }
        counts
    }

    /// Total bytes written by successful jobs
    pub fn bytes_written(&self) -> usize {
        self.jobs
            .iter()
            .filter_map(|job| match &job.outcome {
                Some(JobOutcome::Done { bytes }) => Some(*bytes),
                _ => None,
            })
            .sum()
    }

    /// Wall-clock duration of the dispatch phase
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Prints the run summary to stdout
///
/// # Arguments
///
/// * `outcome` - The outcome of a completed run
pub fn print_summary(outcome: &RunOutcome) {
    println!("=== Download Summary ===\n");

    println!("  Jobs: {}", outcome.total());
    println!("  Done: {}", outcome.done());
    println!("  Skipped: {}", outcome.skipped());
    println!("  Failed: {}", outcome.failed());
    println!("  Bytes written: {}", outcome.bytes_written());
    println!(
        "  Duration: {:.2}s",
        outcome.duration().num_milliseconds() as f64 / 1000.0
    );

    if !outcome.is_clean() {
        println!("\nFailures:");
        for (job, failure) in outcome.failures() {
            let target = job
                .target
                .as_ref()
                .map(|url| url.to_string())
                .unwrap_or_else(|| format!("'{}'", job.reference));
            println!("  #{} {}: {}", job.id, target, failure);
        }
    }
}
