use crate::ConfigError;
use url::Url;

/// Parses the base URL given on the command line
///
/// The base URL must be absolute, use HTTP or HTTPS and carry a host.
///
/// # Arguments
///
/// * `raw` - The URL string as typed by the user
///
/// # Returns
///
/// * `Ok(Url)` - The parsed base URL
/// * `Err(ConfigError)` - The string is not a usable base URL
///
/// # Example
///
/// ```
/// use scrawl::config::parse_base_url;
///
/// let url = parse_base_url("http://example.com/p").unwrap();
/// assert_eq!(url.host_str(), Some("example.com"));
/// assert!(parse_base_url("/relative/path").is_err());
/// ```
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", raw, e)))?;
    check_base_url(&url)?;
    Ok(url)
}

/// Checks that an already parsed URL can serve as a base page address
pub(crate) fn check_base_url(url: &Url) -> Result<(), ConfigError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "'{}' must use the http or https scheme",
            url
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!("'{}' has no host", url)));
    }

    Ok(())
}
