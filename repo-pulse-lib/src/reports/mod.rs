//! Report generation for enriched repositories
//!
//! Two generators are provided, each accessed through a `generate` function:
//! - **Console**: Terminal output with ANSI colors, word wrapping, and an activity sparkline
//! - **JSON**: Machine-readable structured data, one object per repository
//!
//! Both operate on a slice of [`RepoAggregate`](crate::aggregate::RepoAggregate) and
//! an optional [`Pagination`](crate::search::Pagination) describing the page shown.
//! Placeholder facets are flagged in the console report and carry their provenance
//! in the JSON report.

mod common;
mod console;
mod json;

pub use console::generate as generate_console;
pub use json::generate as generate_json;
