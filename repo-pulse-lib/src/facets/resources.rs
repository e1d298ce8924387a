use super::{Facet, log_fallback};
use crate::aggregate::RepoId;
use crate::hosting::{Client, ContentEntry, QueryParams, Transport, UpstreamError};
use serde::{Deserialize, Serialize};

const LOG_TARGET: &str = " resources";

const SECURITY_FILE_NAMES: &[&str] = &["security.md", "security.markdown"];
const CITATION_FILE_NAMES: &[&str] = &["citation.cff", "cite.md", "citation.md"];

/// Which community resources a repository provides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[expect(clippy::struct_excessive_bools, reason = "independent presence flags")]
pub struct ResourceFlags {
    pub has_readme: bool,
    pub has_code_of_conduct: bool,
    pub has_security_policy: bool,
    pub has_citation: bool,
}

/// Placeholder flags used when every check fails.
#[must_use]
pub const fn fallback() -> ResourceFlags {
    ResourceFlags {
        has_readme: true,
        has_code_of_conduct: false,
        has_security_policy: false,
        has_citation: false,
    }
}

/// Case-insensitive membership of any file name in `known`.
#[must_use]
pub fn contains_any<'a>(file_names: impl IntoIterator<Item = &'a str>, known: &[&str]) -> bool {
    file_names
        .into_iter()
        .any(|name| known.iter().any(|k| name.eq_ignore_ascii_case(k)))
}

/// Derive the security and citation flags from a root directory listing.
#[must_use]
pub fn scan_listing(entries: &[ContentEntry]) -> (bool, bool) {
    let names = || entries.iter().map(|e| e.name.as_str());
    (contains_any(names(), SECURITY_FILE_NAMES), contains_any(names(), CITATION_FILE_NAMES))
}

pub async fn fetch<T: Transport>(client: &Client<T>, id: &RepoId) -> Facet<ResourceFlags> {
    let base = format!("/repos/{}/{}", id.owner(), id.name());
    let readme = format!("{base}/readme");
    let code_of_conduct = format!("{base}/community/code_of_conduct");
    let contents = format!("{base}/contents");

    let (readme, code_of_conduct, listing) = tokio::join!(
        exists(client, &readme),
        exists(client, &code_of_conduct),
        root_listing(client, &contents),
    );

    if let (Err(e), Err(_), Err(_)) = (&readme, &code_of_conduct, &listing) {
        log_fallback(id, "resources", e);
        return Facet::synthetic(fallback());
    }

    let (has_security_policy, has_citation) = listing.as_deref().map(scan_listing).unwrap_or_default();

    Facet::live(ResourceFlags {
        has_readme: readme.unwrap_or(false),
        has_code_of_conduct: code_of_conduct.unwrap_or(false),
        has_security_policy,
        has_citation,
    })
}

/// Whether `endpoint` exists. A 404 that persists through the retries is `Ok(false)`.
async fn exists<T: Transport>(client: &Client<T>, endpoint: &str) -> Result<bool, UpstreamError> {
    match client.fetch(endpoint, &QueryParams::new()).await {
        Ok(_) => Ok(true),
        Err(e) if e.is_not_found() => Ok(false),
        Err(e) => {
            log::debug!(target: LOG_TARGET, "Could not check {endpoint}: {e}");
            Err(e)
        }
    }
}

async fn root_listing<T: Transport>(client: &Client<T>, endpoint: &str) -> Result<Vec<ContentEntry>, UpstreamError> {
    match client.fetch(endpoint, &QueryParams::new()).await {
        Ok(payload) => Ok(serde_json::from_value(payload).unwrap_or_else(|e| {
            log::debug!(target: LOG_TARGET, "Unexpected listing shape from {endpoint}: {e}");
            Vec::new()
        })),
        Err(e) if e.is_not_found() => Ok(Vec::new()),
        Err(e) => {
            log::debug!(target: LOG_TARGET, "Could not list {endpoint}: {e}");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(names: &[&str]) -> Vec<ContentEntry> {
        names.iter().map(|n| ContentEntry { name: (*n).to_string() }).collect()
    }

    #[test]
    fn test_scan_is_case_insensitive() {
        let (security, citation) = scan_listing(&listing(&["README.md", "SECURITY.md", "CITATION.cff"]));
        assert!(security);
        assert!(citation);
    }

    #[test]
    fn test_scan_alternate_names() {
        let (security, citation) = scan_listing(&listing(&["Security.markdown", "CITE.md"]));
        assert!(security);
        assert!(citation);
    }

    #[test]
    fn test_scan_no_matches() {
        let (security, citation) = scan_listing(&listing(&["src", "Cargo.toml", "security.txt", "citations.cff"]));
        assert!(!security);
        assert!(!citation);
    }

    #[test]
    fn test_fallback_has_only_readme() {
        let flags = fallback();
        assert!(flags.has_readme);
        assert!(!flags.has_code_of_conduct);
        assert!(!flags.has_security_policy);
        assert!(!flags.has_citation);
    }
}
