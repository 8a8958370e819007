use url::Url;

/// Derives the local file name for a resolved URL
///
/// The name is the last non-empty path segment, percent-decoded. Query and
/// fragment are ignored, so two URLs differing only there share a file name.
///
/// Returns `None` when the URL has no path segments (e.g. `http://ex.com/`),
/// cannot be a base (e.g. `mailto:`), or when the decoded segment would
/// escape the output directory.
///
/// # Examples
///
/// ```
/// use scrawl::url::file_name_for;
/// use url::Url;
///
/// let url = Url::parse("https://ex.com/img/my%20cat.png?v=2").unwrap();
/// assert_eq!(file_name_for(&url).as_deref(), Some("my cat.png"));
/// ```
pub fn file_name_for(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.filter(|s| !s.is_empty()).last()?;

    let decoded = urlencoding::decode(segment)
        .map(|name| name.into_owned())
        .unwrap_or_else(|_| segment.to_string());

    if decoded == "."
        || decoded == ".."
        || decoded.contains(|c| matches!(c, '/' | '\\' | '\0'))
    {
        return None;
    }

    Some(decoded)
}
