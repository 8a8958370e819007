use crate::url::file_name::file_name_for;
use crate::{UrlError, UrlResult};
use url::Url;

/// A raw reference resolved against the base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Absolute URL of the asset
    pub url: Url,

    /// Local file name, the last path segment of `url`
    pub file_name: Option<String>,

    /// True when `url` is identical to the base URL
    pub degenerate: bool,
}

impl ResolvedTarget {
    /// Returns the file name or an error naming the URL that lacks one
    pub fn require_file_name(&self) -> UrlResult<&str> {
        self.file_name
            .as_deref()
            .ok_or_else(|| UrlError::NoFileName(self.url.to_string()))
    }
}

/// Resolves a raw reference against the base URL
///
/// Standard RFC 3986 reference resolution is applied without further
/// normalization. An empty reference resolves to the base URL itself, which
/// is flagged as `degenerate` rather than treated as an error.
///
/// # Arguments
///
/// * `base` - The absolute URL of the scanned page
/// * `raw` - The reference as extracted from the page
///
/// # Returns
///
/// * `Ok(ResolvedTarget)` - The absolute URL and its derived file name
/// * `Err(UrlError)` - The reference is not a URI at all
///
/// # Examples
///
/// ```
/// use scrawl::url::resolve;
/// use url::Url;
///
/// let base = Url::parse("http://ex.com/p").unwrap();
///
/// let target = resolve(&base, "/a.png").unwrap();
/// assert_eq!(target.url.as_str(), "http://ex.com/a.png");
/// assert_eq!(target.file_name.as_deref(), Some("a.png"));
///
/// let empty = resolve(&base, "").unwrap();
/// assert_eq!(empty.url, base);
/// assert!(empty.degenerate);
/// ```
pub fn resolve(base: &Url, raw: &str) -> UrlResult<ResolvedTarget> {
    let url = if raw.is_empty() {
        base.clone()
    } else {
        base.join(raw)
            .map_err(|e| UrlError::Parse(format!("'{}': {}", raw, e)))?
    };

    let degenerate = url == *base;
    let file_name = file_name_for(&url);

    Ok(ResolvedTarget {
        url,
        file_name,
        degenerate,
    })
}
