use crate::config::parser::check_base_url;
use crate::config::types::{RunConfig, MAX_CONCURRENCY};
use crate::ConfigError;
use scraper::Selector;

/// Validates the entire configuration
///
/// Returns the parsed selector on success.
pub fn validate(config: &RunConfig) -> Result<Selector, ConfigError> {
    check_base_url(&config.base_url)?;
    let selector = validate_selector(&config.selector)?;
    validate_concurrency(config.concurrency)?;
    validate_request_options(config)?;
    Ok(selector)
}

/// Validates that the selector is non-empty and parses as CSS
fn validate_selector(selector: &str) -> Result<Selector, ConfigError> {
    if selector.trim().is_empty() {
        return Err(ConfigError::InvalidSelector(
            "selector cannot be empty".to_string(),
        ));
    }

    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {}", selector, e)))
}

/// Validates the admission gate capacity
fn validate_concurrency(concurrency: usize) -> Result<(), ConfigError> {
    if concurrency < 1 || concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, concurrency
        )));
    }

    Ok(())
}

/// Validates timeout and user agent
fn validate_request_options(config: &RunConfig) -> Result<(), ConfigError> {
    if config.timeout.is_some_and(|t| t.is_zero()) {
        return Err(ConfigError::Validation(
            "timeout must be greater than zero".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}
