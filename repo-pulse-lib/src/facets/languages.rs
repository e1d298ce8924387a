use super::{Facet, log_fallback};
use crate::aggregate::RepoId;
use crate::hosting::{Client, QueryParams, Transport};
use std::collections::BTreeMap;

/// Language name to integer percentage of the repository's bytes.
pub type LanguageBreakdown = BTreeMap<String, u8>;

/// Convert raw byte counts into rounded integer percentages.
///
/// Languages that round to zero percent are dropped. Rounding drift of a point or two
/// in the total is left as is.
#[must_use]
pub fn percentages(bytes: &BTreeMap<String, u64>) -> LanguageBreakdown {
    let total: u128 = bytes.values().map(|&b| u128::from(b)).sum();
    if total == 0 {
        return LanguageBreakdown::new();
    }

    bytes
        .iter()
        .filter_map(|(language, &count)| {
            // round half up without going through floating point
            let pct = (u128::from(count) * 200 + total) / (2 * total);
            let pct = u8::try_from(pct).ok()?;
            (pct > 0).then(|| (language.clone(), pct))
        })
        .collect()
}

/// Placeholder breakdown used when the languages call fails.
#[must_use]
pub fn fallback() -> LanguageBreakdown {
    [("JavaScript", 60), ("TypeScript", 30), ("CSS", 10)]
        .into_iter()
        .map(|(language, pct)| (language.to_string(), pct))
        .collect()
}

pub async fn fetch<T: Transport>(client: &Client<T>, id: &RepoId) -> Facet<LanguageBreakdown> {
    let endpoint = format!("/repos/{}/{}/languages", id.owner(), id.name());
    match client.fetch_as::<BTreeMap<String, u64>>(&endpoint, &QueryParams::new()).await {
        Ok(bytes) => Facet::live(percentages(&bytes)),
        Err(e) => {
            log_fallback(id, "languages", &e);
            Facet::synthetic(fallback())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(entries: &[(&str, u64)]) -> BTreeMap<String, u64> {
        entries.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    #[test]
    fn test_simple_split() {
        let result = percentages(&bytes(&[("Rust", 750), ("Shell", 250)]));
        assert_eq!(result.get("Rust"), Some(&75));
        assert_eq!(result.get("Shell"), Some(&25));
    }

    #[test]
    fn test_zero_percent_entries_are_dropped() {
        let result = percentages(&bytes(&[("Rust", 100_000), ("Makefile", 10)]));
        assert_eq!(result.get("Rust"), Some(&100));
        assert!(!result.contains_key("Makefile"));
    }

    #[test]
    fn test_half_rounds_up() {
        // 1/200 of the total is exactly half a percent
        let result = percentages(&bytes(&[("A", 199), ("B", 1)]));
        assert_eq!(result.get("B"), Some(&1));
        assert_eq!(result.get("A"), Some(&100));
    }

    #[test]
    fn test_bounds_hold() {
        let result = percentages(&bytes(&[("A", 1), ("B", 3), ("C", 5), ("D", 7), ("E", 11)]));
        let sum: u32 = result.values().map(|&p| u32::from(p)).sum();

        assert!(result.values().all(|&p| p > 0 && p <= 100));
        assert!((98..=102).contains(&sum));
    }

    #[test]
    fn test_empty_and_zero_total() {
        assert!(percentages(&BTreeMap::new()).is_empty());
        assert!(percentages(&bytes(&[("Rust", 0)])).is_empty());
    }

    #[test]
    fn test_fallback() {
        let fallback = fallback();
        assert_eq!(fallback.get("JavaScript"), Some(&60));
        assert_eq!(fallback.get("TypeScript"), Some(&30));
        assert_eq!(fallback.get("CSS"), Some(&10));
    }
}
