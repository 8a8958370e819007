use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Default number of jobs allowed in flight at once
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Upper bound accepted for the admission gate capacity
pub const MAX_CONCURRENCY: usize = 100;

/// User agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("scrawl/", env!("CARGO_PKG_VERSION"));

/// Configuration for a single scrawl run
///
/// Immutable once the run starts.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Absolute URL of the page to scan
    pub base_url: Url,

    /// CSS selector identifying the nodes holding asset references
    pub selector: String,

    /// Attribute to read from each matched node; text content when `None`
    pub attr: Option<String>,

    /// Directory the assets are written to
    pub dir: PathBuf,

    /// Replace files that already exist instead of skipping them
    pub overwrite: bool,

    /// Maximum number of jobs holding the admission gate at once
    pub concurrency: usize,

    /// Per-request timeout; requests never time out when `None`
    pub timeout: Option<Duration>,

    /// Value of the `User-Agent` request header
    pub user_agent: String,
}

impl RunConfig {
    /// Creates a configuration with default options
    pub fn new(base_url: Url, selector: impl Into<String>) -> Self {
        Self {
            base_url,
            selector: selector.into(),
            attr: None,
            dir: PathBuf::from("."),
            overwrite: false,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Attribute name to extract, treating an empty name as "use text content"
    pub fn attr_name(&self) -> Option<&str> {
        self.attr.as_deref().filter(|a| !a.is_empty())
    }
}
