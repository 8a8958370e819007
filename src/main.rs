//! Scrawl main entry point
//!
//! This is the command-line interface for the Scrawl asset downloader.

use clap::Parser;
use scrawl::config::{parse_base_url, RunConfig, DEFAULT_CONCURRENCY};
use scrawl::download::run;
use scrawl::output::print_summary;
use scrawl::ScrawlError;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Scrawl: download every asset a CSS selector finds on a page
///
/// Scrawl fetches BASE_URL, collects one reference per node matched by
/// SELECTOR (an attribute value with --attr, the node's text otherwise),
/// resolves them against BASE_URL and downloads them concurrently into
/// the output directory.
#[derive(Parser, Debug)]
#[command(name = "scrawl")]
#[command(version)]
#[command(about = "Download page assets matched by a CSS selector", long_about = None)]
struct Cli {
    /// URL of the page to scan
    #[arg(value_name = "BASE_URL")]
    base_url: String,

    /// CSS selector matching the nodes that reference assets
    #[arg(value_name = "SELECTOR")]
    selector: String,

    /// Attribute to query on each matched node (text content when empty)
    #[arg(long, default_value = "")]
    attr: String,

    /// Output directory
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Replace files that already exist instead of skipping them
    #[arg(long)]
    overwrite: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Maximum number of downloads in flight
    #[arg(short = 'j', long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Per-request timeout in seconds (no timeout by default)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Usage errors exit with code 2 from inside clap
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match build_config(cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::from(e.exit_code());
        }
    };

    match run(config).await {
        Ok(outcome) => {
            print_summary(&outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity
fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("scrawl=debug,info")
    } else {
        EnvFilter::new("scrawl=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Turns parsed arguments into a run configuration
fn build_config(cli: Cli) -> Result<RunConfig, ScrawlError> {
    let base_url = parse_base_url(&cli.base_url)?;

    let mut config = RunConfig::new(base_url, cli.selector);
    config.attr = Some(cli.attr).filter(|a| !a.is_empty());
    config.dir = cli.dir;
    config.overwrite = cli.overwrite;
    config.concurrency = cli.concurrency;
    config.timeout = cli.timeout.map(Duration::from_secs);

    tracing::debug!(
        "Output directory: {}, overwrite: {}",
        config.dir.display(),
        config.overwrite
    );

    Ok(config)
}
