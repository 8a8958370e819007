//! Configuration module for Scrawl
//!
//! A run is configured entirely from the command line; this module holds the
//! resulting [`RunConfig`] and validates it before anything touches the network.
//!
//! # Example
//!
//! ```
//! use scrawl::config::{parse_base_url, validate, RunConfig};
//!
//! let base = parse_base_url("https://example.com/gallery").unwrap();
//! let config = RunConfig::new(base, "img");
//! assert!(validate(&config).is_ok());
//! assert_eq!(config.concurrency, 5);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{RunConfig, DEFAULT_CONCURRENCY, DEFAULT_USER_AGENT, MAX_CONCURRENCY};

// Re-export parser and validation functions
pub use parser::parse_base_url;
pub use validation::validate;
