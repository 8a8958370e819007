/// Job state definitions for tracking download progress
///
/// A job moves strictly forward through these states and never retries.
use std::fmt;

/// Represents the current state of a download job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    // ===== Active States =====
    /// Job has been created but has not been admitted yet
    Pending,

    /// Raw reference is being resolved against the base URL
    Resolving,

    /// Asset bytes are being retrieved
    Fetching,

    /// Asset bytes are being written to disk
    Writing,

    // ===== Terminal States =====
    /// Asset was downloaded and written
    Done,

    /// Destination already existed and overwriting was not requested
    Skipped,

    /// Job ended with an error
    Failed,
}

impl JobState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Skipped | Self::Failed)
    }

    /// Returns true if this is an active state (job may still make progress)
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if the lifecycle allows moving from `self` to `next`
    ///
    /// Any active state may fail. A skip is decided either by the existence
    /// check after resolving or by the writer's own guard.
    pub fn can_transition_to(&self, next: JobState) -> bool {
        match (self, next) {
            (s, Self::Failed) => s.is_active(),
            (Self::Pending, Self::Resolving) => true,
            (Self::Resolving, Self::Fetching | Self::Skipped) => true,
            (Self::Fetching, Self::Writing) => true,
            (Self::Writing, Self::Done | Self::Skipped) => true,
            _ => false,
        }
    }

    /// Short lowercase name used in logs and summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Resolving => "resolving",
            Self::Fetching => "fetching",
            Self::Writing => "writing",
            Self::Done => "done",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }

    /// Returns all possible job states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Pending,
            Self::Resolving,
            Self::Fetching,
            Self::Writing,
            Self::Done,
            Self::Skipped,
            Self::Failed,
        ]
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
