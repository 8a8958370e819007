//! Selector-driven reference extraction
//!
//! Parses a fetched page and pulls one raw reference out of every node
//! matched by the selector, either an attribute value or the node's text.

use scraper::{Html, Selector};
use thiserror::Error;

/// Errors raised while extracting references from a page
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("document is not valid markup: {0}")]
    Parse(String),

    #[error("invalid CSS selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}

/// Parses a CSS selector
pub fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Extracts raw references from page bytes
///
/// Standalone entry point that parses `selector` itself. A run parses the
/// selector once during validation and calls [`select_references`].
///
/// For each node matched by `selector`, in document order, the value is the
/// attribute named `attr` or, when `attr` is `None` or empty, the node's text
/// content. Values are trimmed. A node lacking the attribute yields an empty
/// reference, so the result always has one entry per matched node.
///
/// # Arguments
///
/// * `page` - Raw bytes of the fetched page
/// * `selector` - CSS selector identifying the nodes of interest
/// * `attr` - Optional attribute to read from each node
///
/// # Returns
///
/// * `Ok(Vec<String>)` - One raw reference per matched node, not deduplicated
/// * `Err(ExtractError)` - The page is binary data or the selector does not parse
///
/// # Example
///
/// ```
/// use scrawl::download::extract;
///
/// let page = br#"<img src=" /a.png "><img alt="no source">"#;
/// let refs = extract(page, "img", Some("src")).unwrap();
/// assert_eq!(refs, vec!["/a.png".to_string(), String::new()]);
/// ```
pub fn extract(
    page: &[u8],
    selector: &str,
    attr: Option<&str>,
) -> Result<Vec<String>, ExtractError> {
    let selector = parse_selector(selector)?;
    select_references(page, &selector, attr)
}

/// Extracts raw references with an already parsed selector
///
/// Bytes that are not valid UTF-8 are decoded lossily, so pages in legacy
/// encodings still yield their references. Only binary content, recognised
/// by a NUL byte, is rejected.
pub fn select_references(
    page: &[u8],
    selector: &Selector,
    attr: Option<&str>,
) -> Result<Vec<String>, ExtractError> {
    if let Some(offset) = page.iter().position(|&b| b == 0) {
        return Err(ExtractError::Parse(format!(
            "binary content (NUL byte at offset {})",
            offset
        )));
    }

    let html = String::from_utf8_lossy(page);
    let document = Html::parse_document(&html);
    let attr = attr.filter(|a| !a.is_empty());

    let references = document
        .select(selector)
        .map(|element| {
            let value = match attr {
                Some(name) => element.value().attr(name).unwrap_or_default().to_string(),
                None => element.text().collect::<String>(),
            };
            value.trim().to_string()
        })
        .collect();

    Ok(references)
}
