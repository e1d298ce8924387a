use super::Host;
use super::common::{Common, CommonArgs, sample_pagination};
use crate::Result;
use crate::sample::sample_repos;
use crate::search::{Explorer, MAX_PER_PAGE, TrendingPeriod};
use clap::Parser;

#[derive(Parser, Debug)]
pub struct TrendingArgs {
    /// How recently the repositories must have been created
    #[arg(long, short = 'p', value_name = "PERIOD", default_value = "weekly")]
    pub period: TrendingPeriod,

    /// Page of results to show
    #[arg(long, default_value_t = 1, value_name = "N")]
    pub page: u32,

    /// Repositories per page, 1 to 100 (default comes from the configuration)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PER_PAGE)))]
    pub per_page: Option<u32>,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn trending_repos<H: Host>(host: &mut H, args: &TrendingArgs) -> Result<()> {
    let mut common = Common::new(host, &args.common)?;

    if common.offline() {
        let samples = sample_repos()?;
        return common.report(&samples, Some(&sample_pagination(&samples)));
    }

    let per_page = args.per_page.unwrap_or(common.config.per_page);
    let explorer = Explorer::new(common.client()?);
    let page = explorer.trending(args.period, args.page, per_page).await;

    common.report_or_sample(&page.repos, Some(&page.pagination))
}
