//! Download module: the concurrent retrieval pipeline
//!
//! This module contains the core of a run, including:
//! - HTTP fetching with status validation
//! - Selector-driven reference extraction
//! - Bounded-concurrency job dispatch
//! - Per-job outcome tracking

mod dispatcher;
mod extractor;
mod fetcher;
mod gate;
mod job;

pub use dispatcher::Dispatcher;
pub use extractor::{extract, parse_selector, select_references, ExtractError};
pub use fetcher::{build_http_client, FetchError, Fetcher};
pub use gate::{AdmissionGate, GatePermit};
pub use job::{DownloadJob, JobFailure, JobOutcome};

use crate::config::{validate, RunConfig};
use crate::output::RunOutcome;
use crate::ScrawlError;

/// Runs a complete download operation
///
/// This is the main entry point for a run. It will:
/// 1. Validate the configuration and parse the selector
/// 2. Build the HTTP client
/// 3. Fetch the base page
/// 4. Extract raw references with the selector
/// 5. Dispatch one job per reference and wait for all of them
///
/// Steps 1 to 4 are setup: any failure there aborts the run with an error.
/// Once dispatch begins, job failures are recorded in the returned
/// [`RunOutcome`] and the run itself succeeds.
///
/// # Arguments
///
/// * `config` - The run configuration
///
/// # Returns
///
/// * `Ok(RunOutcome)` - Every job reached a terminal state
/// * `Err(ScrawlError)` - Setup failed or the selector matched nothing
///
/// # Example
///
/// ```no_run
/// use scrawl::config::{parse_base_url, RunConfig};
/// use scrawl::download::run;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut config = RunConfig::new(parse_base_url("https://example.com/gallery")?, "img");
/// config.attr = Some("src".to_string());
/// let outcome = run(config).await?;
/// println!("{} downloaded, {} failed", outcome.done(), outcome.failed());
/// # Ok(())
/// # }
/// ```
pub async fn run(config: RunConfig) -> Result<RunOutcome, ScrawlError> {
    let selector = validate(&config)?;

    let fetcher = Fetcher::from_config(&config).map_err(ScrawlError::ClientBuild)?;

    tracing::info!("Scraping page '{}'", config.base_url);
    let page = fetcher
        .fetch(&config.base_url)
        .await
        .map_err(|source| ScrawlError::PageFetch {
            url: config.base_url.to_string(),
            source,
        })?;

    let references = select_references(&page, &selector, config.attr_name()).map_err(|source| {
        ScrawlError::PageParse {
            url: config.base_url.to_string(),
            source,
        }
    })?;

    if references.is_empty() {
        return Err(ScrawlError::NoReferences {
            selector: config.selector.clone(),
        });
    }
    tracing::info!(
        "Found {} references matching '{}'",
        references.len(),
        config.selector
    );

    let dispatcher = Dispatcher::from_config(&config, fetcher);
    Ok(dispatcher.dispatch(references).await)
}
