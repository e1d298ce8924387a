use crate::Result;
use crate::aggregate::RepoAggregate;
use crate::search::Pagination;
use core::fmt::Write;
use serde_json::json;

/// Write `{"repos": [...], "pagination": {...}}`, omitting pagination when there is none.
pub fn generate<W: Write>(repos: &[RepoAggregate], pagination: Option<&Pagination>, writer: &mut W) -> Result<()> {
    let output = pagination.map_or_else(
        || json!({ "repos": repos }),
        |pagination| json!({ "repos": repos, "pagination": pagination }),
    );

    write!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}
