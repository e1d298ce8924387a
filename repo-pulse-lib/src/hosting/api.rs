//! GitHub API payloads
//!
//! Minimal views of the GitHub REST responses, holding only the fields we need.

use serde::Deserialize;

/// Response of `GET /search/repositories`
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<RepoItem>,
}

/// A repository as returned by the search and repository endpoints
#[derive(Debug, Clone, Deserialize)]
#[expect(clippy::struct_field_names, reason = "field names match GitHub API exactly")]
pub struct RepoItem {
    pub full_name: String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub license: Option<LicenseItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LicenseItem {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// One entry of `GET /repos/{owner}/{repo}/contributors`
#[derive(Debug, Clone, Deserialize)]
pub struct Contributor {
    /// Anonymous contributors have no login
    #[serde(default)]
    pub login: Option<String>,
    pub contributions: u64,
}

/// One week of `GET /repos/{owner}/{repo}/stats/commit_activity`
#[derive(Debug, Clone, Deserialize)]
pub struct WeeklyActivity {
    pub total: u64,
}

/// One entry of `GET /repos/{owner}/{repo}/events`
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
}

/// One entry of a directory listing from `GET /repos/{owner}/{repo}/contents`
#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    pub name: String,
}

/// A single file from `GET /repos/{owner}/{repo}/contents/{path}`
#[derive(Debug, Clone, Deserialize)]
pub struct ContentFile {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_deserialize() {
        let json = r#"{
            "total_count": 2500,
            "incomplete_results": false,
            "items": [
                {
                    "full_name": "tokio-rs/tokio",
                    "stargazers_count": 28000,
                    "description": "A runtime for writing reliable asynchronous applications",
                    "topics": ["async", "rust"],
                    "license": { "key": "mit", "name": "MIT License", "url": "https://api.github.com/licenses/mit" }
                }
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.total_count, 2500);
        assert_eq!(response.items.len(), 1);

        let item = &response.items[0];
        assert_eq!(item.full_name, "tokio-rs/tokio");
        assert_eq!(item.stargazers_count, 28000);
        assert_eq!(item.topics, vec!["async", "rust"]);
        assert_eq!(item.license.as_ref().unwrap().name, "MIT License");
    }

    #[test]
    fn test_repo_item_optional_fields() {
        let json = r#"{ "full_name": "owner/repo", "description": null, "license": null }"#;

        let item: RepoItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.stargazers_count, 0);
        assert!(item.description.is_none());
        assert!(item.topics.is_empty());
        assert!(item.license.is_none());
    }

    #[test]
    fn test_anonymous_contributor() {
        let json = r#"{ "contributions": 3, "type": "Anonymous" }"#;

        let contributor: Contributor = serde_json::from_str(json).unwrap();
        assert!(contributor.login.is_none());
        assert_eq!(contributor.contributions, 3);
    }

    #[test]
    fn test_event_type_field() {
        let json = r#"{ "id": "1", "type": "PushEvent", "actor": {} }"#;

        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.kind, "PushEvent");
    }

    #[test]
    fn test_weekly_activity() {
        let json = r#"{ "days": [0, 3, 26, 20, 39, 1, 0], "total": 89, "week": 1336280400 }"#;

        let week: WeeklyActivity = serde_json::from_str(json).unwrap();
        assert_eq!(week.total, 89);
    }
}
