//! State module for tracking download job progress
//!
//! # Components
//!
//! - `JobState`: Lifecycle of a single download job (pending, resolving, fetching, writing, done, etc.)

mod job_state;

// Re-export main types
pub use job_state::JobState;
