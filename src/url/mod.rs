//! URL handling module for Scrawl
//!
//! This module turns raw references pulled from a page into absolute URLs and
//! derives the local file name each asset is stored under.

mod file_name;
mod resolve;

// Re-export main functions
pub use file_name::file_name_for;
pub use resolve::{resolve, ResolvedTarget};
