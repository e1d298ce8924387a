//! The independently fetched facets of a repository
//!
//! Each submodule owns one facet: its data type, the pure transform from the upstream
//! payload, the placeholder used when the fetch fails, and an async `fetch` that never
//! fails. Facet values carry a [`Provenance`] so callers can tell live data from
//! placeholders.

pub mod activity;
pub mod citation;
pub mod contributors;
pub mod events;
pub mod languages;
pub mod provenance;
pub mod resources;

pub use activity::ActivityHistory;
pub use citation::{CitationAuthor, CitationData, PreferredCitation, format_citation};
pub use contributors::ContributorBreakdown;
pub use events::EventCounts;
pub use languages::LanguageBreakdown;
pub use provenance::{Facet, Provenance};
pub use resources::ResourceFlags;

use crate::aggregate::RepoId;
use core::fmt::Display;

const LOG_TARGET: &str = "    facets";

fn log_fallback(id: &RepoId, facet: &str, cause: &dyn Display) {
    log::warn!(target: LOG_TARGET, "Using placeholder {facet} for {id}: {cause}");
}
