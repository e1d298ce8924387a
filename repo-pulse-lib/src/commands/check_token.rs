use super::Host;
use super::common::{LogLevel, init_logging};
use super::config::Config;
use crate::Result;
use crate::hosting::Client;
use camino::Utf8PathBuf;
use clap::Parser;
use ohno::bail;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct CheckTokenArgs {
    /// GitHub personal access token to check
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Path to configuration file (default is `repo-pulse.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,
}

/// Check a token against GitHub, exiting with status 1 when it is rejected
pub async fn check_token<H: Host>(host: &mut H, args: &CheckTokenArgs) -> Result<()> {
    init_logging(args.log_level);

    let Some(token) = args.github_token.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
        bail!("no token given; pass --github-token or set GITHUB_TOKEN");
    };

    let config = Config::load(args.config.as_deref())?;
    let client = Client::new(&config.client_settings(None, true))?;

    if client.validate_credential(token).await {
        let _ = writeln!(host.output(), "The token is valid");
    } else {
        let _ = writeln!(host.error(), "The token was rejected by {}", config.api_base_url);
        host.exit(1);
    }

    Ok(())
}
