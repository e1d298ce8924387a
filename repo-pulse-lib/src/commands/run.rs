//! Command dispatch logic for repo-pulse

use super::{
    CheckTokenArgs, InitArgs, RepoArgs, SampleArgs, SearchArgs, TrendingArgs, check_token, init_config, search_repos, show_repo,
    show_sample, trending_repos,
};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "repo-pulse", version, author, long_about = None)]
#[command(about = "Collaboration and impact metrics for open-source repositories")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: PulseSubcommand,
}

#[derive(Subcommand, Debug)]
enum PulseSubcommand {
    /// Search repositories and report their enriched metrics
    Search(Box<SearchArgs>),
    /// Report repositories that gained attention recently
    Trending(Box<TrendingArgs>),
    /// Report the enriched metrics of a single repository
    Repo(Box<RepoArgs>),
    /// Print the built-in sample dataset
    Sample(SampleArgs),
    /// Generate a default configuration file
    Init(InitArgs),
    /// Check whether a GitHub token is accepted
    CheckToken(CheckTokenArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match &Cli::parse_from(args).command {
        PulseSubcommand::Search(search_args) => search_repos(host, search_args).await,
        PulseSubcommand::Trending(trending_args) => trending_repos(host, trending_args).await,
        PulseSubcommand::Repo(repo_args) => show_repo(host, repo_args).await,
        PulseSubcommand::Sample(sample_args) => show_sample(host, sample_args),
        PulseSubcommand::Init(init_args) => init_config(host, init_args),
        PulseSubcommand::CheckToken(check_args) => check_token(host, check_args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::TestHost;

    #[tokio::test]
    async fn sample_json_lists_every_sample_repository() {
        let mut host = TestHost::new();
        run(&mut host, ["repo-pulse", "sample", "--json"]).await.unwrap();

        let report: serde_json::Value = serde_json::from_str(&host.output_text()).unwrap();
        let repos = report["repos"].as_array().unwrap();
        assert_eq!(repos.len(), 4);
        assert_eq!(repos[0]["name"], "facebook/react");
        assert_eq!(report["pagination"]["current_page"], 1);
        assert_eq!(report["pagination"]["total_pages"], 1);
    }

    #[tokio::test]
    async fn sample_console_report_names_repositories() {
        let mut host = TestHost::new();
        run(&mut host, ["repo-pulse", "sample", "--color", "never"]).await.unwrap();

        let text = host.output_text();
        assert!(text.contains("facebook/react"));
        assert!(text.contains("flutter/flutter"));
        assert!(!text.contains('\u{1b}'), "no escape codes expected with --color never");
    }

    #[tokio::test]
    async fn init_writes_parsable_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pulse.toml");
        let path_str = path.to_str().unwrap();

        let mut host = TestHost::new();
        run(&mut host, ["repo-pulse", "init", path_str]).await.unwrap();

        assert!(host.output_text().contains("Generated default configuration file"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(super::super::config::Config::parse(&text).is_ok());
    }

    #[tokio::test]
    async fn offline_search_reports_sample_data() {
        let mut host = TestHost::new();
        run(&mut host, ["repo-pulse", "search", "anything", "--offline", "--json"]).await.unwrap();

        let report: serde_json::Value = serde_json::from_str(&host.output_text()).unwrap();
        assert_eq!(report["repos"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn offline_repo_finds_sample_entry() {
        let mut host = TestHost::new();
        run(&mut host, ["repo-pulse", "repo", "microsoft/vscode", "--offline", "--json"]).await.unwrap();

        let report: serde_json::Value = serde_json::from_str(&host.output_text()).unwrap();
        let repos = report["repos"].as_array().unwrap();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0]["name"], "microsoft/vscode");
        assert!(report.get("pagination").is_none());
    }

    #[tokio::test]
    async fn offline_repo_rejects_unknown_repository() {
        let mut host = TestHost::new();
        let result = run(&mut host, ["repo-pulse", "repo", "nobody/nothing", "--offline"]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn repo_rejects_malformed_identifier() {
        let mut host = TestHost::new();
        let result = run(&mut host, ["repo-pulse", "repo", "not-a-repo", "--offline"]).await;
        assert!(result.is_err());
    }

    #[test]
    fn per_page_outside_api_range_is_rejected() {
        for subcommand in ["search", "trending"] {
            assert!(Cli::try_parse_from(["repo-pulse", subcommand, "--per-page", "150"]).is_err());
            assert!(Cli::try_parse_from(["repo-pulse", subcommand, "--per-page", "0"]).is_err());
            assert!(Cli::try_parse_from(["repo-pulse", subcommand, "--per-page", "100"]).is_ok());
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
