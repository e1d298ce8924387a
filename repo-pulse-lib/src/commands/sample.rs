use super::Host;
use super::common::{ColorMode, Common, CommonArgs, LogLevel, sample_pagination};
use crate::Result;
use crate::sample::sample_repos;
use clap::Parser;

#[derive(Parser, Debug)]
pub struct SampleArgs {
    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Write the dataset to stdout as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn show_sample<H: Host>(host: &mut H, args: &SampleArgs) -> Result<()> {
    let common_args = CommonArgs {
        github_token: None,
        config: None,
        color: args.color,
        log_level: LogLevel::None,
        json: args.json,
        offline: true,
        ignore_cached: false,
    };

    let mut common = Common::new(host, &common_args)?;
    let samples = sample_repos()?;
    common.report(&samples, Some(&sample_pagination(&samples)))
}
