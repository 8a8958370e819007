//! Output module: asset persistence and run reporting
//!
//! This module handles:
//! - Writing downloaded assets under the output directory
//! - Aggregating per-job outcomes into a run summary

mod summary;
mod writer;

pub use summary::{print_summary, RunOutcome};
pub use writer::{file_exists, write_file, WriteError, WriteStatus};
