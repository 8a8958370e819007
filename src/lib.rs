//! Scrawl: a bulk downloader for page-embedded assets
//!
//! This crate fetches a single HTML page, extracts asset references with a CSS
//! selector, resolves them against the page URL and downloads every asset
//! concurrently into a local directory.

pub mod config;
pub mod download;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Scrawl operations
///
/// Setup-level failures abort the run before any download job is
/// dispatched. Per-job failures are recorded as [`download::JobFailure`]
/// instead and never surface here.
#[derive(Debug, Error)]
pub enum ScrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Failed to fetch page {url}: {source}")]
    PageFetch {
        url: String,
        source: download::FetchError,
    },

    #[error("Failed to parse page {url}: {source}")]
    PageParse {
        url: String,
        source: download::ExtractError,
    },

    #[error("No references matched selector '{selector}'")]
    NoReferences { selector: String },

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::JobState,
        to: state::JobState,
    },
}

impl ScrawlError {
    /// Process exit code for this error
    ///
    /// `2` is shared with command-line usage errors and signals that the
    /// selector matched nothing. Every other setup failure exits with `1`.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::NoReferences { .. } => 2,
            _ => 1,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Failed to parse reference: {0}")]
    Parse(String),

    #[error("No usable file name in {0}")]
    NoFileName(String),
}

/// Result type alias for Scrawl operations
pub type Result<T> = std::result::Result<T, ScrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::RunConfig;
pub use crate::url::{resolve, ResolvedTarget};
pub use download::{run, Dispatcher, DownloadJob, JobFailure, JobOutcome};
pub use output::RunOutcome;
pub use state::JobState;
