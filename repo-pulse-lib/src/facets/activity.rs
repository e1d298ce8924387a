use super::{Facet, log_fallback};
use crate::aggregate::RepoId;
use crate::hosting::{Client, QueryParams, Transport, WeeklyActivity};
use rand::Rng;

/// Number of months in an activity history.
pub const MONTHS: usize = 12;

const WEEKS_PER_MONTH: usize = 4;

/// Approximate monthly commit counts, oldest first.
pub type ActivityHistory = [u64; MONTHS];

/// Fold weekly commit totals (oldest first) into monthly buckets.
///
/// Months are four consecutive weeks counted back from the most recent week, so only
/// the latest 48 weeks contribute. With a shorter history the oldest month may be
/// partial and the missing months are zero at the front.
#[must_use]
pub fn fold_weeks(weekly: &[u64]) -> ActivityHistory {
    let window = MONTHS * WEEKS_PER_MONTH;
    let recent = &weekly[weekly.len().saturating_sub(window)..];

    let mut months: Vec<u64> = recent.rchunks(WEEKS_PER_MONTH).map(|chunk| chunk.iter().sum()).collect();
    months.reverse();

    let mut history = [0; MONTHS];
    let offset = MONTHS - months.len();
    history[offset..].copy_from_slice(&months);
    history
}

/// Twelve random values in `10..110` used when the statistics call fails.
#[must_use]
pub fn fallback() -> ActivityHistory {
    let mut rng = rand::thread_rng();
    core::array::from_fn(|_| rng.gen_range(10..110))
}

pub async fn fetch<T: Transport>(client: &Client<T>, id: &RepoId) -> Facet<ActivityHistory> {
    let endpoint = format!("/repos/{}/{}/stats/commit_activity", id.owner(), id.name());
    match client.fetch_as::<Vec<WeeklyActivity>>(&endpoint, &QueryParams::new()).await {
        Ok(weeks) => {
            let weekly: Vec<u64> = weeks.iter().map(|w| w.total).collect();
            Facet::live(fold_weeks(&weekly))
        }
        Err(e) => {
            log_fallback(id, "activity", &e);
            Facet::synthetic(fallback())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_year() {
        // 52 weeks; the oldest 4 fall outside the window
        let weekly: Vec<u64> = (1..=52).collect();
        let history = fold_weeks(&weekly);

        assert_eq!(history[0], 5 + 6 + 7 + 8);
        assert_eq!(history[11], 49 + 50 + 51 + 52);
    }

    #[test]
    fn test_length_is_always_twelve() {
        for n in 0..120 {
            let weekly = vec![1; n];
            assert_eq!(fold_weeks(&weekly).len(), MONTHS);
        }
    }

    #[test]
    fn test_short_history_is_front_padded() {
        let history = fold_weeks(&[1, 1, 1, 1, 2, 2, 2, 2]);
        assert_eq!(history, [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4, 8]);
    }

    #[test]
    fn test_partial_oldest_month() {
        let history = fold_weeks(&[3, 1, 1, 1, 1]);
        assert_eq!(history[10], 3);
        assert_eq!(history[11], 4);
    }

    #[test]
    fn test_empty() {
        assert_eq!(fold_weeks(&[]), [0; MONTHS]);
    }

    #[test]
    fn test_fallback_range() {
        assert!(fallback().iter().all(|v| (10..110).contains(v)));
    }
}
