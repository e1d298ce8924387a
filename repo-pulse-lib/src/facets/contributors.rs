use super::{Facet, log_fallback};
use crate::aggregate::RepoId;
use crate::hosting::{Client, Contributor, QueryParams, Transport};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Contributors split into four mutually exclusive engagement buckets.
///
/// The bucket counts always add up to the number of contributors observed. Only the
/// two most engaged buckets carry per-login details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorBreakdown {
    pub core_developers: u64,
    pub active_volunteers: u64,
    pub occasional_volunteers: u64,
    pub one_time_contributors: u64,
    pub core_dev_details: Vec<(String, u64)>,
    pub active_volunteer_details: Vec<(String, u64)>,
}

impl ContributorBreakdown {
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.core_developers + self.active_volunteers + self.occasional_volunteers + self.one_time_contributors
    }
}

/// Bucket sizes for `total` contributors.
///
/// Roughly the top 5% are core (at least 1), the next 15% active (at least 2), the
/// next 30% occasional (at least 3) and the rest one-time. The minimums never push
/// the buckets past `total`.
#[must_use]
pub const fn bucket_sizes(total: u64) -> [u64; 4] {
    let core = min(max(1, total * 5 / 100), total);
    let rest = total - core;

    let active = min(max(2, total * 15 / 100), rest);
    let rest = rest - active;

    let occasional = min(max(3, total * 30 / 100), rest);
    let one_time = rest - occasional;

    [core, active, occasional, one_time]
}

const fn min(a: u64, b: u64) -> u64 {
    if a < b { a } else { b }
}

const fn max(a: u64, b: u64) -> u64 {
    if a > b { a } else { b }
}

/// Categorize a contributor list.
#[must_use]
pub fn categorize(mut contributors: Vec<Contributor>) -> ContributorBreakdown {
    contributors.sort_by(|a, b| b.contributions.cmp(&a.contributions));

    let [core, active, occasional, one_time] = bucket_sizes(contributors.len() as u64);

    #[expect(clippy::cast_possible_truncation, reason = "bucket sizes never exceed the list length")]
    let (core_len, active_len) = (core as usize, active as usize);

    let details = |slice: &[Contributor]| {
        slice
            .iter()
            .map(|c| (c.login.clone().unwrap_or_else(|| "anonymous".to_string()), c.contributions))
            .collect()
    };

    ContributorBreakdown {
        core_developers: core,
        active_volunteers: active,
        occasional_volunteers: occasional,
        one_time_contributors: one_time,
        core_dev_details: details(&contributors[..core_len]),
        active_volunteer_details: details(&contributors[core_len..core_len + active_len]),
    }
}

/// Randomized but plausible breakdown used when the contributors call fails.
#[must_use]
pub fn fallback() -> ContributorBreakdown {
    let mut rng = rand::thread_rng();

    let core_dev_details = [("user1", 500), ("user2", 400), ("user3", 300), ("user4", 200)]
        .into_iter()
        .map(|(login, spread)| (login.to_string(), rng.gen_range(100..100 + spread)))
        .collect();

    let active_volunteer_details = [("user5", 100), ("user6", 90), ("user7", 80), ("user8", 70)]
        .into_iter()
        .map(|(login, spread)| (login.to_string(), rng.gen_range(50..50 + spread)))
        .collect();

    ContributorBreakdown {
        core_developers: rng.gen_range(5..25),
        active_volunteers: rng.gen_range(20..70),
        occasional_volunteers: rng.gen_range(50..150),
        one_time_contributors: rng.gen_range(100..600),
        core_dev_details,
        active_volunteer_details,
    }
}

pub async fn fetch<T: Transport>(client: &Client<T>, id: &RepoId) -> Facet<ContributorBreakdown> {
    let endpoint = format!("/repos/{}/{}/contributors", id.owner(), id.name());
    let params = QueryParams::from([("per_page".to_string(), "100".to_string())]);

    match client.fetch_as::<Vec<Contributor>>(&endpoint, &params).await {
        Ok(contributors) => Facet::live(categorize(contributors)),
        Err(e) => {
            log_fallback(id, "contributors", &e);
            Facet::synthetic(fallback())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contributors(n: u64) -> Vec<Contributor> {
        (0..n)
            .map(|i| Contributor {
                login: Some(format!("dev{i}")),
                contributions: i + 1,
            })
            .collect()
    }

    #[test]
    fn test_buckets_sum_to_total() {
        for n in 0..=250 {
            let sizes = bucket_sizes(n);
            assert_eq!(sizes.iter().sum::<u64>(), n, "n = {n}");
        }
    }

    #[test]
    fn test_minimums_when_total_allows() {
        let [core, active, occasional, _] = bucket_sizes(10);
        assert_eq!(core, 1);
        assert_eq!(active, 2);
        assert_eq!(occasional, 3);
    }

    #[test]
    fn test_small_totals_are_clamped() {
        assert_eq!(bucket_sizes(0), [0, 0, 0, 0]);
        assert_eq!(bucket_sizes(1), [1, 0, 0, 0]);
        assert_eq!(bucket_sizes(2), [1, 1, 0, 0]);
        assert_eq!(bucket_sizes(4), [1, 2, 1, 0]);
        assert_eq!(bucket_sizes(6), [1, 2, 3, 0]);
    }

    #[test]
    fn test_proportions_for_large_totals() {
        assert_eq!(bucket_sizes(100), [5, 15, 30, 50]);
        assert_eq!(bucket_sizes(1000), [50, 150, 300, 500]);
    }

    #[test]
    fn test_categorize_sorts_descending() {
        let breakdown = categorize(contributors(100));

        assert_eq!(breakdown.total(), 100);
        assert_eq!(breakdown.core_dev_details.len(), 5);
        assert_eq!(breakdown.active_volunteer_details.len(), 15);
        assert_eq!(breakdown.core_dev_details[0], ("dev99".to_string(), 100));
        assert_eq!(breakdown.active_volunteer_details[0], ("dev94".to_string(), 95));
    }

    #[test]
    fn test_categorize_anonymous_contributor() {
        let breakdown = categorize(vec![Contributor {
            login: None,
            contributions: 7,
        }]);

        assert_eq!(breakdown.core_dev_details, vec![("anonymous".to_string(), 7)]);
        assert!(breakdown.active_volunteer_details.is_empty());
    }

    #[test]
    fn test_fallback_ranges() {
        let fallback = fallback();

        assert!((5..25).contains(&fallback.core_developers));
        assert!((20..70).contains(&fallback.active_volunteers));
        assert!((50..150).contains(&fallback.occasional_volunteers));
        assert!((100..600).contains(&fallback.one_time_contributors));
        assert_eq!(fallback.core_dev_details.len(), 4);
        assert_eq!(fallback.active_volunteer_details[0].0, "user5");
    }
}
