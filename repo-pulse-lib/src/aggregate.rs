//! The per-repository record and the base record it grows from.

use crate::Result;
use crate::facets::{
    ActivityHistory, CitationData, ContributorBreakdown, EventCounts, Facet, LanguageBreakdown, ResourceFlags,
};
use crate::hosting::RepoItem;
use core::fmt::{Display, Formatter};
use ohno::bail;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// An `owner/name` repository identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoId {
    owner: Arc<str>,
    name: Arc<str>,
}

impl RepoId {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let Some((owner, name)) = s.split_once('/') else {
            bail!("invalid repository identity '{s}': expected 'owner/name'");
        };

        if owner.is_empty() || name.is_empty() || name.contains('/') {
            bail!("invalid repository identity '{s}': expected 'owner/name'");
        }

        Ok(Self {
            owner: Arc::from(owner),
            name: Arc::from(name),
        })
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for RepoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl TryFrom<String> for RepoId {
    type Error = ohno::AppError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<RepoId> for String {
    fn from(value: RepoId) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// The part of a repository record that comes straight from a search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoBase {
    pub id: RepoId,
    pub stars: u64,
    pub description: Option<String>,
    pub topics: Vec<String>,
    pub license: Option<License>,
}

impl RepoBase {
    /// Convert a search or repository payload. Fails when `full_name` is not `owner/name`.
    pub fn from_item(item: RepoItem) -> Result<Self> {
        Ok(Self {
            id: RepoId::parse(&item.full_name)?,
            stars: item.stargazers_count,
            description: item.description,
            topics: item.topics,
            license: item.license.map(|l| License { name: l.name, url: l.url }),
        })
    }
}

/// A fully enriched repository record.
///
/// Every facet is always populated, with live data or a placeholder; only the
/// citation may be absent. Whenever a citation is present, `resources.has_citation`
/// is `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoAggregate {
    #[serde(rename = "name")]
    pub id: RepoId,
    pub stars: u64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub license: Option<License>,
    pub languages: Facet<LanguageBreakdown>,
    pub resources: Facet<ResourceFlags>,
    pub contributors: Facet<ContributorBreakdown>,
    pub activity: Facet<ActivityHistory>,
    pub events: Facet<EventCounts>,
    #[serde(default)]
    pub citation: Option<Facet<CitationData>>,
}

impl RepoAggregate {
    /// Whether any facet holds placeholder data.
    #[must_use]
    pub fn has_placeholders(&self) -> bool {
        self.languages.is_synthetic()
            || self.resources.is_synthetic()
            || self.contributors.is_synthetic()
            || self.activity.is_synthetic()
            || self.events.is_synthetic()
    }
}
