//! Setup and reporting shared by the query commands.

use super::Host;
use super::config::Config;
use crate::Result;
use crate::aggregate::RepoAggregate;
use crate::hosting::Client;
use crate::reports::{generate_console, generate_json};
use crate::sample::sample_repos;
use crate::search::Pagination;
use camino::Utf8PathBuf;
use clap::{Args, ValueEnum};
use std::io::Write;

const LOG_TARGET: &str = "  commands";

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    Auto,
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Arguments shared by every command that produces a repository report
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// GitHub personal access token
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Path to configuration file (default is `repo-pulse.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    pub log_level: LogLevel,

    /// Write the report to stdout as JSON
    #[arg(long)]
    pub json: bool,

    /// Use the built-in sample dataset instead of querying GitHub
    #[arg(long)]
    pub offline: bool,

    /// Ignore cached responses and fetch everything fresh
    #[arg(long)]
    pub ignore_cached: bool,
}

pub struct Common<'a, H: Host> {
    pub config: Config,
    host: &'a mut H,
    token: Option<String>,
    color: ColorMode,
    json: bool,
    offline: bool,
    ignore_cached: bool,
}

impl<'a, H: Host> Common<'a, H> {
    /// Initialize logging and load the configuration
    pub fn new(host: &'a mut H, args: &CommonArgs) -> Result<Self> {
        init_logging(args.log_level);

        let config = Config::load(args.config.as_deref())?;

        Ok(Self {
            config,
            host,
            token: args.github_token.clone(),
            color: args.color,
            json: args.json,
            offline: args.offline,
            ignore_cached: args.ignore_cached,
        })
    }

    pub const fn offline(&self) -> bool {
        self.offline
    }

    /// Build a hosting client from the loaded configuration
    pub fn client(&self) -> Result<Client> {
        let settings = self.config.client_settings(self.token.as_deref(), self.ignore_cached);
        Client::new(&settings)
    }

    /// Write a notice to the error stream
    pub fn notice(&mut self, message: &str) {
        let _ = writeln!(self.host.error(), "{message}");
    }

    /// Report live results, substituting the sample dataset when there are none
    pub fn report_or_sample(&mut self, repos: &[RepoAggregate], pagination: Option<&Pagination>) -> Result<()> {
        if !repos.is_empty() {
            return self.report(repos, pagination);
        }

        log::info!(target: LOG_TARGET, "No live results, showing the sample dataset");
        self.notice("No repositories found on GitHub; showing sample data instead.");
        let samples = sample_repos()?;
        let pagination = sample_pagination(&samples);
        self.report(&samples, Some(&pagination))
    }

    /// Render repositories as a console or JSON report
    pub fn report(&mut self, repos: &[RepoAggregate], pagination: Option<&Pagination>) -> Result<()> {
        let mut text = String::new();

        if self.json {
            generate_json(repos, pagination, &mut text)?;
            text.push('\n');
        } else {
            let use_colors = match self.color {
                ColorMode::Always => true,
                ColorMode::Never => false,
                ColorMode::Auto => {
                    use std::io::{IsTerminal, stdout};
                    stdout().is_terminal()
                }
            };
            generate_console(repos, pagination, use_colors, &mut text)?;
        }

        let _ = write!(self.host.output(), "{text}");
        Ok(())
    }
}

/// Pagination describing the whole sample dataset as one page
pub fn sample_pagination(samples: &[RepoAggregate]) -> Pagination {
    Pagination {
        current_page: 1,
        total_pages: 1,
        items_per_page: u32::try_from(samples.len().max(1)).unwrap_or(u32::MAX),
    }
}

/// Initialize logger based on log level
pub fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    // a logger may already be installed when commands run more than once in-process
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}
