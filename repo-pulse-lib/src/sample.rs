//! Embedded sample dataset
//!
//! A handful of well-known repositories with every facet filled in, used when working
//! offline and when a live query comes back empty.

use crate::Result;
use crate::aggregate::RepoAggregate;
use crate::facets::EventCounts;
use ohno::IntoAppError;

const SAMPLE_REPOS: &str = include_str!("../data/sample_repos.json");

/// Load the sample repositories.
///
/// Event category totals are derived from the per-type counts rather than trusted
/// from the document.
pub fn sample_repos() -> Result<Vec<RepoAggregate>> {
    let mut repos: Vec<RepoAggregate> = serde_json::from_str(SAMPLE_REPOS).into_app_err("parsing the embedded sample dataset")?;

    for repo in &mut repos {
        let counts = core::mem::take(&mut repo.events.value.counts);
        repo.events.value = EventCounts::from_counts(counts);

        if repo.citation.is_some() {
            repo.resources.value.has_citation = true;
        }
    }

    Ok(repos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facets::Provenance;

    #[test]
    fn test_sample_repos_load() {
        let repos = sample_repos().unwrap();
        let names: Vec<_> = repos.iter().map(|r| r.id.to_string()).collect();

        assert_eq!(names, vec!["facebook/react", "tensorflow/tensorflow", "microsoft/vscode", "flutter/flutter"]);
    }

    #[test]
    fn test_every_facet_is_tagged_sample() {
        for repo in sample_repos().unwrap() {
            assert_eq!(repo.languages.provenance, Provenance::Sample);
            assert_eq!(repo.resources.provenance, Provenance::Sample);
            assert_eq!(repo.contributors.provenance, Provenance::Sample);
            assert_eq!(repo.activity.provenance, Provenance::Sample);
            assert_eq!(repo.events.provenance, Provenance::Sample);
            if let Some(citation) = &repo.citation {
                assert_eq!(citation.provenance, Provenance::Sample);
                assert!(repo.resources.value.has_citation);
            }
        }
    }

    #[test]
    fn test_event_totals_are_derived() {
        let repos = sample_repos().unwrap();
        let react = &repos[0].events.value;

        assert_eq!(react.coding_events_total, 1245 + 876);
        assert_eq!(react.social_events_total, 2345);
    }

    #[test]
    fn test_react_citation() {
        let repos = sample_repos().unwrap();
        let citation = &repos[0].citation.as_ref().unwrap().value;

        assert_eq!(citation.authors.len(), 3);
        assert_eq!(citation.preferred_citation.as_ref().unwrap().year, Some(2023));
    }
}
