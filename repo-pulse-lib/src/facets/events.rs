use super::{Facet, log_fallback};
use crate::aggregate::RepoId;
use crate::hosting::{Client, Event, QueryParams, Transport};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Event types that count as coding activity.
pub const CODING_EVENTS: &[&str] = &[
    "PushEvent",
    "PullRequestEvent",
    "CreateEvent",
    "DeleteEvent",
    "CommitCommentEvent",
];

/// Event types that count as social activity.
pub const SOCIAL_EVENTS: &[&str] = &[
    "IssueCommentEvent",
    "IssuesEvent",
    "PullRequestReviewEvent",
    "PullRequestReviewCommentEvent",
    "ForkEvent",
    "WatchEvent",
    "GollumEvent",
];

/// Per-type event tallies plus category totals.
///
/// Event types outside both categories are tallied in `counts` but contribute to
/// neither total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCounts {
    pub counts: BTreeMap<String, u64>,
    #[serde(default)]
    pub coding_events_total: u64,
    #[serde(default)]
    pub social_events_total: u64,
}

impl EventCounts {
    /// Build from per-type counts, deriving both totals.
    #[must_use]
    pub fn from_counts(counts: BTreeMap<String, u64>) -> Self {
        let sum_of = |members: &[&str]| members.iter().filter_map(|m| counts.get(*m)).sum();
        Self {
            coding_events_total: sum_of(CODING_EVENTS),
            social_events_total: sum_of(SOCIAL_EVENTS),
            counts,
        }
    }

    #[must_use]
    pub fn get(&self, kind: &str) -> u64 {
        self.counts.get(kind).copied().unwrap_or(0)
    }
}

/// Tally a list of events by type.
#[must_use]
pub fn tally(events: &[Event]) -> EventCounts {
    let mut counts = BTreeMap::new();
    for event in events {
        *counts.entry(event.kind.clone()).or_insert(0) += 1;
    }
    EventCounts::from_counts(counts)
}

/// Randomized counts used when the events call fails.
#[must_use]
pub fn fallback() -> EventCounts {
    let mut rng = rand::thread_rng();
    let counts = BTreeMap::from([
        ("PushEvent".to_string(), rng.gen_range(100..1100)),
        ("PullRequestEvent".to_string(), rng.gen_range(50..550)),
        ("IssueCommentEvent".to_string(), rng.gen_range(200..1700)),
    ]);
    EventCounts::from_counts(counts)
}

pub async fn fetch<T: Transport>(client: &Client<T>, id: &RepoId) -> Facet<EventCounts> {
    let endpoint = format!("/repos/{}/{}/events", id.owner(), id.name());
    let params = QueryParams::from([("per_page".to_string(), "100".to_string())]);

    match client.fetch_as::<Vec<Event>>(&endpoint, &params).await {
        Ok(events) => Facet::live(tally(&events)),
        Err(e) => {
            log_fallback(id, "events", &e);
            Facet::synthetic(fallback())
        }
    }
}
