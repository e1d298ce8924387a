//! Repository search and trending queries.
//!
//! Both queries fetch a single page of search results, enrich every repository on the
//! page concurrently, and report pagination alongside. The search API never serves
//! more than 1000 results, so pagination is capped accordingly.

use crate::aggregate::RepoAggregate;
use crate::enrich::{bases_from_items, enrich_all};
use crate::hosting::{Client, HttpTransport, QueryParams, SearchResponse, Transport};
use chrono::{Days, Months, NaiveDate, Utc};
use clap::ValueEnum;
use core::sync::atomic::{AtomicU64, Ordering};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

const LOG_TARGET: &str = "    search";

const SEARCH_ENDPOINT: &str = "/search/repositories";

/// The search API serves at most this many results for any query.
pub const MAX_SEARCH_RESULTS: u64 = 1000;

/// Query used when no filter narrows the search.
const DEFAULT_QUERY: &str = "stars:>1000";

/// Largest page size the search API accepts.
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Stars,
    Forks,
    Updated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// How far back trending repositories may have been created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TrendingPeriod {
    /// Created within the last day
    Daily,

    /// Created within the last seven days
    #[default]
    Weekly,

    /// Created within the last calendar month
    Monthly,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    /// Free-text search terms.
    pub query: String,
    pub language: Option<String>,

    /// Minimum star count; only its digits are used, so `">1000"` and `"1000"` are equivalent.
    pub stars: Option<String>,
    pub topic: Option<String>,
    pub sort: Option<SortField>,
    pub order: Option<SortOrder>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub items_per_page: u32,
}

/// One page of enriched repositories.
#[derive(Debug, Clone, Serialize)]
pub struct RepoPage {
    pub repos: Vec<RepoAggregate>,
    pub pagination: Pagination,

    /// Request generation this page belongs to; see [`Explorer::is_current`].
    #[serde(skip)]
    pub generation: u64,
}

/// Build the search expression for `filters`.
#[must_use]
pub fn build_query(filters: &SearchFilters) -> String {
    let mut terms = Vec::new();

    let text = filters.query.trim();
    if !text.is_empty() {
        terms.push(text.to_string());
    }

    if let Some(language) = non_blank(filters.language.as_deref()) {
        terms.push(format!("language:{language}"));
    }

    if let Some(stars) = filters.stars.as_deref() {
        let digits: String = stars.chars().filter(char::is_ascii_digit).collect();
        if !digits.is_empty() {
            terms.push(format!("stars:>{digits}"));
        }
    }

    if let Some(topic) = non_blank(filters.topic.as_deref()) {
        terms.push(format!("topic:{topic}"));
    }

    if terms.is_empty() {
        DEFAULT_QUERY.to_string()
    } else {
        terms.join(" ")
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Earliest creation date that still counts as trending for `period`.
#[must_use]
pub fn trending_cutoff(period: TrendingPeriod, today: NaiveDate) -> NaiveDate {
    let cutoff = match period {
        TrendingPeriod::Daily => today.checked_sub_days(Days::new(1)),
        TrendingPeriod::Weekly => today.checked_sub_days(Days::new(7)),
        TrendingPeriod::Monthly => today.checked_sub_months(Months::new(1)),
    };
    cutoff.unwrap_or(today)
}

#[must_use]
pub fn trending_query(period: TrendingPeriod, today: NaiveDate) -> String {
    format!("created:>{}", trending_cutoff(period, today).format("%Y-%m-%d"))
}

/// Number of pages needed for `total_count` results, never less than one.
#[must_use]
pub fn total_pages(total_count: u64, per_page: u32) -> u32 {
    let per_page = u64::from(per_page.max(1));
    let pages = total_count.min(MAX_SEARCH_RESULTS).div_ceil(per_page).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Search repositories matching `filters` and enrich the requested page.
///
/// `page` is raised to at least 1 and `per_page` is clamped to `1..=`[`MAX_PER_PAGE`];
/// the returned pagination reports the values actually requested.
pub async fn search<T: Transport>(client: &Client<T>, filters: &SearchFilters, page: u32, per_page: u32) -> RepoPage {
    let query = build_query(filters);
    let sort = filters.sort.unwrap_or_default();
    let order = filters.order.unwrap_or_default();
    fetch_page(client, &query, sort, order, page, per_page).await
}

/// List the most starred repositories created within `period`.
///
/// Paging is normalized the same way as in [`search`].
pub async fn trending<T: Transport>(client: &Client<T>, period: TrendingPeriod, page: u32, per_page: u32) -> RepoPage {
    let query = trending_query(period, Utc::now().date_naive());
    fetch_page(client, &query, SortField::Stars, SortOrder::Desc, page, per_page).await
}

async fn fetch_page<T: Transport>(
    client: &Client<T>,
    query: &str,
    sort: SortField,
    order: SortOrder,
    page: u32,
    per_page: u32,
) -> RepoPage {
    let page = page.max(1);
    let per_page = per_page.clamp(1, MAX_PER_PAGE);

    let params = QueryParams::from([
        ("q".to_string(), query.to_string()),
        ("sort".to_string(), sort.to_string()),
        ("order".to_string(), order.to_string()),
        ("page".to_string(), page.to_string()),
        ("per_page".to_string(), per_page.to_string()),
    ]);

    log::info!(target: LOG_TARGET, "Searching '{query}' (page {page}, {per_page} per page)");

    let response = match client.fetch_as::<SearchResponse>(SEARCH_ENDPOINT, &params).await {
        Ok(response) => response,
        Err(e) => {
            log::error!(target: LOG_TARGET, "Could not search for '{query}': {e:#}");
            return RepoPage {
                repos: Vec::new(),
                pagination: Pagination {
                    current_page: page,
                    total_pages: 1,
                    items_per_page: per_page,
                },
                generation: 0,
            };
        }
    };

    let repos = enrich_all(client, bases_from_items(response.items)).await;

    RepoPage {
        repos,
        pagination: Pagination {
            current_page: page,
            total_pages: total_pages(response.total_count, per_page),
            items_per_page: per_page,
        },
        generation: 0,
    }
}

/// Runs queries on behalf of an interactive consumer.
///
/// Every result is stamped with a new generation number. A consumer that fires a new
/// query while an older one is still in flight uses [`Explorer::is_current`] to drop
/// the older result when it finally arrives.
#[derive(Debug)]
pub struct Explorer<T = HttpTransport> {
    client: Client<T>,
    generation: AtomicU64,
}

impl<T: Transport> Explorer<T> {
    #[must_use]
    pub const fn new(client: Client<T>) -> Self {
        Self {
            client,
            generation: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub const fn client(&self) -> &Client<T> {
        &self.client
    }

    pub fn set_credential(&self, token: Option<&str>) -> crate::Result<()> {
        self.client.set_credential(token)
    }

    pub async fn search(&self, filters: &SearchFilters, page: u32, per_page: u32) -> RepoPage {
        let generation = self.next_generation();
        let mut result = search(&self.client, filters, page, per_page).await;
        result.generation = generation;
        result
    }

    pub async fn trending(&self, period: TrendingPeriod, page: u32, per_page: u32) -> RepoPage {
        let generation = self.next_generation();
        let mut result = trending(&self.client, period, page, per_page).await;
        result.generation = generation;
        result
    }

    /// Whether `page` answers the most recently issued query.
    #[must_use]
    pub fn is_current(&self, page: &RepoPage) -> bool {
        page.generation == self.generation.load(Ordering::SeqCst)
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hosting::scripted::{Reply, ScriptedTransport};
    use crate::hosting::{ClientSettings, RetryPolicy};
    use core::time::Duration;

    fn settings() -> ClientSettings {
        ClientSettings {
            retry: RetryPolicy {
                max_retries: 1,
                base_delay: Duration::from_millis(1),
            },
            ..ClientSettings::default()
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn search_reply(total_count: u64, names: &[&str]) -> Reply {
        let items: Vec<_> = names
            .iter()
            .map(|n| serde_json::json!({ "full_name": n, "stargazers_count": 10 }))
            .collect();
        Reply::ok(serde_json::json!({ "total_count": total_count, "items": items }))
    }

    #[test]
    fn test_empty_filters_use_default_query() {
        assert_eq!(build_query(&SearchFilters::default()), "stars:>1000");
    }

    #[test]
    fn test_query_composition_order() {
        let filters = SearchFilters {
            query: " web framework ".to_string(),
            language: Some("rust".to_string()),
            stars: Some(">500".to_string()),
            topic: Some("http".to_string()),
            ..SearchFilters::default()
        };

        assert_eq!(build_query(&filters), "web framework language:rust stars:>500 topic:http");
    }

    #[test]
    fn test_stars_filter_keeps_digits_only() {
        let filters = SearchFilters {
            stars: Some(">1,000".to_string()),
            ..SearchFilters::default()
        };
        assert_eq!(build_query(&filters), "stars:>1000");

        let filters = SearchFilters {
            query: "cli".to_string(),
            stars: Some("lots".to_string()),
            ..SearchFilters::default()
        };
        assert_eq!(build_query(&filters), "cli");
    }

    #[test]
    fn test_blank_filters_are_ignored() {
        let filters = SearchFilters {
            language: Some("  ".to_string()),
            topic: Some(String::new()),
            ..SearchFilters::default()
        };
        assert_eq!(build_query(&filters), "stars:>1000");
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(2500, 10), 100);
        assert_eq!(total_pages(35, 10), 4);
        assert_eq!(total_pages(1000, 30), 34);
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn test_trending_cutoffs() {
        let today = date(2024, 3, 31);
        assert_eq!(trending_query(TrendingPeriod::Daily, today), "created:>2024-03-30");
        assert_eq!(trending_query(TrendingPeriod::Weekly, today), "created:>2024-03-24");

        // one calendar month back, clamped to the end of a shorter month
        assert_eq!(trending_query(TrendingPeriod::Monthly, today), "created:>2024-02-29");
        assert_eq!(trending_cutoff(TrendingPeriod::Monthly, date(2024, 1, 15)), date(2023, 12, 15));
    }

    #[test]
    fn test_enum_names() {
        assert_eq!(SortField::Updated.to_string(), "updated");
        assert_eq!(SortOrder::Asc.to_string(), "asc");
        assert_eq!("monthly".parse::<TrendingPeriod>().unwrap(), TrendingPeriod::Monthly);
    }

    #[tokio::test]
    async fn test_search_sends_query_and_paginates() {
        let transport = ScriptedTransport::new().script(SEARCH_ENDPOINT, vec![search_reply(2500, &["a/one", "b/two"])]);
        let client = Client::with_transport(transport, &settings()).unwrap();
        let filters = SearchFilters {
            stars: Some(">1000".to_string()),
            ..SearchFilters::default()
        };

        let page = search(&client, &filters, 1, 10).await;

        assert_eq!(page.repos.len(), 2);
        assert_eq!(
            page.pagination,
            Pagination {
                current_page: 1,
                total_pages: 100,
                items_per_page: 10
            }
        );

        let request = client
            .transport()
            .requests()
            .into_iter()
            .find(|r| r.endpoint == SEARCH_ENDPOINT)
            .unwrap();
        assert_eq!(request.params["q"], "stars:>1000");
        assert_eq!(request.params["sort"], "stars");
        assert_eq!(request.params["order"], "desc");
        assert_eq!(request.params["page"], "1");
        assert_eq!(request.params["per_page"], "10");
    }

    #[tokio::test]
    async fn test_page_failure_is_empty() {
        let client = Client::with_transport(ScriptedTransport::new(), &settings()).unwrap();

        let page = search(&client, &SearchFilters::default(), 3, 10).await;

        assert!(page.repos.is_empty());
        assert_eq!(page.pagination.current_page, 3);
        assert_eq!(page.pagination.total_pages, 1);
        assert_eq!(page.pagination.items_per_page, 10);
    }

    #[tokio::test]
    async fn test_oversized_page_is_clamped() {
        let transport = ScriptedTransport::new().script(SEARCH_ENDPOINT, vec![search_reply(0, &[])]);
        let client = Client::with_transport(transport, &settings()).unwrap();

        let page = search(&client, &SearchFilters::default(), 0, 150).await;

        assert_eq!(page.pagination.current_page, 1);
        assert_eq!(page.pagination.items_per_page, MAX_PER_PAGE);
        let request = &client.transport().requests()[0];
        assert_eq!(request.params["per_page"], "100");
        assert_eq!(request.params["page"], "1");
    }

    #[tokio::test]
    async fn test_trending_sorts_by_stars() {
        let transport = ScriptedTransport::new().script(SEARCH_ENDPOINT, vec![search_reply(3, &["new/repo"])]);
        let client = Client::with_transport(transport, &settings()).unwrap();

        let page = trending(&client, TrendingPeriod::Daily, 1, 10).await;

        assert_eq!(page.repos.len(), 1);
        assert_eq!(page.pagination.total_pages, 1);

        let request = &client.transport().requests()[0];
        assert!(request.params["q"].starts_with("created:>"));
        assert_eq!(request.params["sort"], "stars");
    }

    #[tokio::test]
    async fn test_explorer_detects_superseded_pages() {
        let transport = ScriptedTransport::new().script(SEARCH_ENDPOINT, vec![search_reply(0, &[])]);
        let explorer = Explorer::new(Client::with_transport(transport, &settings()).unwrap());

        let first = explorer.search(&SearchFilters::default(), 1, 10).await;
        assert!(explorer.is_current(&first));

        let second = explorer.trending(TrendingPeriod::Weekly, 1, 10).await;
        assert!(!explorer.is_current(&first));
        assert!(explorer.is_current(&second));
        assert!(second.generation > first.generation);
    }
}
