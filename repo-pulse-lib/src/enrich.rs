//! Turning base records into fully enriched aggregates.
//!
//! All six facets of a repository are fetched concurrently and merged once every one
//! of them has settled. A facet that cannot be fetched falls back to its placeholder,
//! so enrichment itself never fails.

use crate::Result;
use crate::aggregate::{RepoAggregate, RepoBase, RepoId};
use crate::facets::{
    ActivityHistory, CitationData, ContributorBreakdown, EventCounts, Facet, LanguageBreakdown, ResourceFlags, activity,
    citation, contributors, events, languages, resources,
};
use crate::hosting::{Client, QueryParams, RepoItem, Transport};
use futures_util::future::join_all;

const LOG_TARGET: &str = "    enrich";

/// The settled outcome of every facet fetch for one repository.
#[derive(Debug, Clone)]
pub struct FacetResults {
    pub languages: Facet<LanguageBreakdown>,
    pub resources: Facet<ResourceFlags>,
    pub contributors: Facet<ContributorBreakdown>,
    pub activity: Facet<ActivityHistory>,
    pub events: Facet<EventCounts>,
    pub citation: Option<Facet<CitationData>>,
}

/// Fetch all facets of `id` concurrently.
pub async fn fetch_facets<T: Transport>(client: &Client<T>, id: &RepoId) -> FacetResults {
    let (languages, resources, contributors, activity, events, citation) = tokio::join!(
        languages::fetch(client, id),
        resources::fetch(client, id),
        contributors::fetch(client, id),
        activity::fetch(client, id),
        events::fetch(client, id),
        citation::fetch(client, id),
    );

    FacetResults {
        languages,
        resources,
        contributors,
        activity,
        events,
        citation,
    }
}

/// Combine a base record with its settled facets.
///
/// A present citation forces `has_citation` on, whatever the resource check found.
#[must_use]
pub fn merge(base: RepoBase, facets: FacetResults) -> RepoAggregate {
    let mut resources = facets.resources;
    if facets.citation.is_some() {
        resources.value.has_citation = true;
    }

    RepoAggregate {
        id: base.id,
        stars: base.stars,
        description: base.description,
        topics: base.topics,
        license: base.license,
        languages: facets.languages,
        resources,
        contributors: facets.contributors,
        activity: facets.activity,
        events: facets.events,
        citation: facets.citation,
    }
}

/// Enrich one base record.
pub async fn enrich<T: Transport>(client: &Client<T>, base: RepoBase) -> RepoAggregate {
    let facets = fetch_facets(client, &base.id).await;
    let aggregate = merge(base, facets);

    if aggregate.has_placeholders() {
        log::info!(target: LOG_TARGET, "Enriched {} with placeholder data", aggregate.id);
    } else {
        log::debug!(target: LOG_TARGET, "Enriched {}", aggregate.id);
    }

    aggregate
}

/// Enrich a page of base records concurrently, preserving their order.
pub async fn enrich_all<T: Transport>(client: &Client<T>, bases: Vec<RepoBase>) -> Vec<RepoAggregate> {
    join_all(bases.into_iter().map(|base| enrich(client, base))).await
}

/// Convert search items into base records, skipping any with a malformed identity.
#[must_use]
pub fn bases_from_items(items: Vec<RepoItem>) -> Vec<RepoBase> {
    items
        .into_iter()
        .filter_map(|item| match RepoBase::from_item(item) {
            Ok(base) => Some(base),
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Skipping search result: {e:#}");
                None
            }
        })
        .collect()
}

/// Look up the base record of a single repository.
pub async fn fetch_base<T: Transport>(client: &Client<T>, id: &RepoId) -> Result<RepoBase> {
    let endpoint = format!("/repos/{}/{}", id.owner(), id.name());
    let item: RepoItem = client.fetch_as(&endpoint, &QueryParams::new()).await?;
    RepoBase::from_item(item)
}
