//! Command-line interface and orchestration for repo-pulse
//!
//! This module implements the CLI commands and wires the hosting client, the
//! facet fetchers, the enrichment orchestrator and the report generators into
//! end-to-end workflows.
//!
//! # Implementation Model
//!
//! ## Commands
//!
//! - **search**: Run a filtered repository search, enrich every hit, and report one page
//! - **trending**: Report repositories created within a recent period, ordered by stars
//! - **repo**: Enrich a single `owner/name` repository
//! - **sample**: Print the embedded sample dataset
//! - **init**: Generate a default configuration file
//! - **check-token**: Validate a GitHub personal access token
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap and routes
//! to the appropriate command handler. The query commands share one pattern:
//!
//! 1. Initialize logging and load configuration
//! 2. Build a hosting client with the configured cache, retry and concurrency settings
//! 3. Fetch base records and enrich them concurrently
//! 4. Fall back to the sample dataset when nothing live came back
//! 5. Render a console or JSON report
//!
//! The `common` module holds the shared arguments, logging setup, and the
//! report dispatch that chooses between output formats.

mod check_token;
mod common;
mod config;
mod host;
mod init;
mod repo;
mod run;
mod sample;
mod search;
mod trending;

#[cfg(debug_assertions)]
pub use config::Config;

pub use check_token::{CheckTokenArgs, check_token};
pub use host::Host;
#[cfg(test)]
pub use host::TestHost;
pub use init::{InitArgs, init_config};
pub use repo::{RepoArgs, show_repo};
pub use run::run;
pub use sample::{SampleArgs, show_sample};
pub use search::{SearchArgs, search_repos};
pub use trending::{TrendingArgs, trending_repos};
