use super::Host;
use super::common::{Common, CommonArgs, sample_pagination};
use crate::Result;
use crate::sample::sample_repos;
use crate::search::{Explorer, MAX_PER_PAGE, SearchFilters, SortField, SortOrder};
use clap::Parser;

#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Free-text search terms
    #[arg(value_name = "TERMS")]
    pub terms: Vec<String>,

    /// Only repositories written mainly in this language
    #[arg(long, value_name = "LANGUAGE")]
    pub language: Option<String>,

    /// Only repositories with more stars than this (e.g. ">1000")
    #[arg(long, value_name = "COUNT")]
    pub stars: Option<String>,

    /// Only repositories tagged with this topic
    #[arg(long, value_name = "TOPIC")]
    pub topic: Option<String>,

    /// Sort field
    #[arg(long, value_name = "FIELD")]
    pub sort: Option<SortField>,

    /// Sort order
    #[arg(long, value_name = "ORDER")]
    pub order: Option<SortOrder>,

    /// Page of results to show
    #[arg(long, default_value_t = 1, value_name = "N")]
    pub page: u32,

    /// Repositories per page, 1 to 100 (default comes from the configuration)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PER_PAGE)))]
    pub per_page: Option<u32>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl SearchArgs {
    #[must_use]
    pub fn filters(&self) -> SearchFilters {
        SearchFilters {
            query: self.terms.join(" "),
            language: self.language.clone(),
            stars: self.stars.clone(),
            topic: self.topic.clone(),
            sort: self.sort,
            order: self.order,
        }
    }
}

pub async fn search_repos<H: Host>(host: &mut H, args: &SearchArgs) -> Result<()> {
    let mut common = Common::new(host, &args.common)?;

    if common.offline() {
        let samples = sample_repos()?;
        return common.report(&samples, Some(&sample_pagination(&samples)));
    }

    let per_page = args.per_page.unwrap_or(common.config.per_page);
    let explorer = Explorer::new(common.client()?);
    let page = explorer.search(&args.filters(), args.page, per_page).await;

    common.report_or_sample(&page.repos, Some(&page.pagination))
}
