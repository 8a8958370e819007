//! Download jobs and their outcomes

use crate::download::FetchError;
use crate::output::WriteError;
use crate::state::JobState;
use crate::{ScrawlError, UrlError};
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Why a single job failed
///
/// These never abort sibling jobs or the run.
#[derive(Debug, Error)]
pub enum JobFailure {
    #[error("invalid reference: {0}")]
    InvalidReference(#[from] UrlError),

    #[error("reference resolves to the scanned page itself")]
    DegenerateTarget,

    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("write failed: {0}")]
    Write(#[from] WriteError),

    #[error("job aborted: {0}")]
    Aborted(String),
}

impl JobFailure {
    /// Short category name used in summaries
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidReference(_) => "invalid-reference",
            Self::DegenerateTarget => "degenerate-target",
            Self::Fetch(_) => "fetch",
            Self::Write(_) => "write",
            Self::Aborted(_) => "aborted",
        }
    }
}

/// Terminal result of a job
#[derive(Debug)]
pub enum JobOutcome {
    /// Asset written; carries the number of bytes
    Done { bytes: usize },

    /// Destination already existed and was left untouched
    Skipped,

    /// Job ended with an error
    Failed(JobFailure),
}

impl JobOutcome {
    /// Terminal state matching this outcome
    pub fn state(&self) -> JobState {
        match self {
            Self::Done { .. } => JobState::Done,
            Self::Skipped => JobState::Skipped,
            Self::Failed(_) => JobState::Failed,
        }
    }

    /// The failure, if this outcome is one
    pub fn failure(&self) -> Option<&JobFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// One retrieval-and-write task for a single raw reference
#[derive(Debug)]
pub struct DownloadJob {
    /// Ordinal id, starting at 1 in extraction order
    pub id: usize,

    /// The raw reference as extracted from the page
    pub reference: String,

    /// Current lifecycle state
    pub state: JobState,

    /// Every state the job has been in, oldest first
    pub history: Vec<JobState>,

    /// Absolute URL once resolved
    pub target: Option<Url>,

    /// Destination path once computed
    pub path: Option<PathBuf>,

    /// Set when the job reaches a terminal state
    pub outcome: Option<JobOutcome>,
}

impl DownloadJob {
    /// Creates a pending job
    pub fn new(id: usize, reference: impl Into<String>) -> Self {
        Self {
            id,
            reference: reference.into(),
            state: JobState::Pending,
            history: vec![JobState::Pending],
            target: None,
            path: None,
            outcome: None,
        }
    }

    /// Moves the job to `next`, rejecting backward or skipping moves
    pub fn advance(&mut self, next: JobState) -> Result<(), ScrawlError> {
        if !self.state.can_transition_to(next) {
            return Err(ScrawlError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }

        self.state = next;
        self.history.push(next);
        Ok(())
    }

    /// Records the terminal outcome
    ///
    /// An outcome the lifecycle does not allow from the current state is
    /// recorded as an aborted failure instead.
    pub fn finish(&mut self, outcome: JobOutcome) {
        let outcome = match self.advance(outcome.state()) {
            Ok(()) => outcome,
            Err(err) => {
                tracing::warn!("Job {}: {}", self.id, err);
                if self.state.is_active() {
                    self.state = JobState::Failed;
                    self.history.push(JobState::Failed);
                }
                JobOutcome::Failed(JobFailure::Aborted(err.to_string()))
            }
        };

        self.outcome = Some(outcome);
    }

    /// Returns true once the job has reached a terminal state
    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// The failure, if the job failed
    pub fn failure(&self) -> Option<&JobFailure> {
        self.outcome.as_ref().and_then(JobOutcome::failure)
    }
}
