//! Citation metadata from a repository's `CITATION.cff` file.
//!
//! The file is a YAML document in the Citation File Format. Only the fields shown to
//! users are extracted; anything missing is simply absent, and a document that does
//! not parse yields no citation at all.

use super::Facet;
use crate::aggregate::RepoId;
use crate::hosting::{Client, ContentFile, QueryParams, Transport};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use core::fmt::Write;
use ohno::{IntoAppError, bail};
use serde::{Deserialize, Deserializer, Serialize};

const LOG_TARGET: &str = "  citation";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationData {
    #[serde(default)]
    pub authors: Vec<CitationAuthor>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub date_released: Option<String>,
    #[serde(default)]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub preferred_citation: Option<PreferredCitation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationAuthor {
    pub name: String,
    #[serde(default)]
    pub affiliation: Option<String>,
}

/// The work the authors would rather have cited than the software itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferredCitation {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub journal: Option<String>,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub doi: Option<String>,
}

/// Render a one-line human-readable citation.
#[must_use]
pub fn format_citation(citation: &CitationData) -> String {
    if let Some(preferred) = &citation.preferred_citation {
        let year = preferred.year.map(|y| y.to_string()).unwrap_or_default();
        let mut text = format!("{}. ({year}). {}.", preferred.authors.join(", "), preferred.title);

        if let Some(journal) = &preferred.journal {
            let _ = write!(text, " {journal}.");
        }

        if let Some(doi) = &preferred.doi {
            let _ = write!(text, " DOI: {doi}");
        }

        return text;
    }

    let authors = if citation.authors.is_empty() {
        "Unknown Author".to_string()
    } else {
        citation.authors.iter().map(|a| a.name.as_str()).collect::<Vec<_>>().join(", ")
    };

    let mut text = format!("{authors}. {}.", citation.title.as_deref().unwrap_or("Untitled"));

    if let Some(version) = &citation.version {
        let _ = write!(text, " Version {version}.");
    }

    if let Some(date) = &citation.date_released {
        let _ = write!(text, " Released: {date}.");
    }

    text
}

/// Decode the base64 body of a contents API file, tolerating embedded line breaks.
pub fn decode_content(encoded: &str) -> crate::Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(compact).into_app_err("invalid base64 content")?;
    String::from_utf8(bytes).into_app_err("citation file is not UTF-8")
}

/// Parse a CFF document.
pub fn parse_cff(text: &str) -> crate::Result<CitationData> {
    let document: CffDocument = serde_yaml::from_str(text).into_app_err("malformed CITATION.cff")?;
    Ok(document.into())
}

pub async fn fetch<T: Transport>(client: &Client<T>, id: &RepoId) -> Option<Facet<CitationData>> {
    let endpoint = format!("/repos/{}/{}/contents/CITATION.cff", id.owner(), id.name());

    let file = match client.fetch_as::<ContentFile>(&endpoint, &QueryParams::new()).await {
        Ok(file) => file,
        Err(e) => {
            log::debug!(target: LOG_TARGET, "No citation for {id}: {e:#}");
            return None;
        }
    };

    match citation_from_file(&file) {
        Ok(citation) => Some(Facet::live(citation)),
        Err(e) => {
            log::warn!(target: LOG_TARGET, "Ignoring the citation file of {id}: {e:#}");
            None
        }
    }
}

fn citation_from_file(file: &ContentFile) -> crate::Result<CitationData> {
    let Some(content) = file.content.as_deref() else {
        bail!("the contents response has no body");
    };

    let text = match file.encoding.as_deref() {
        None | Some("base64") => decode_content(content)?,
        Some(_) => content.to_string(),
    };

    parse_cff(&text)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct CffDocument {
    #[serde(default)]
    authors: Vec<CffAuthor>,
    #[serde(default, deserialize_with = "lenient_text")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    version: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    doi: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    date_released: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    repository_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    repository_url: Option<String>,
    #[serde(default)]
    preferred_citation: Option<CffReference>,
}

/// An author is either a person, an entity with a `name`, or a bare string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CffAuthor {
    Text(String),
    Fields(CffAuthorFields),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct CffAuthorFields {
    #[serde(default, deserialize_with = "lenient_text")]
    given_names: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    family_names: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    affiliation: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct CffReference {
    #[serde(default, rename = "type", deserialize_with = "lenient_text")]
    kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    title: Option<String>,
    #[serde(default)]
    authors: Vec<CffAuthor>,
    #[serde(default, deserialize_with = "lenient_text")]
    journal: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    year: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    doi: Option<String>,
}

impl CffAuthor {
    fn display_name(&self) -> Option<String> {
        match self {
            Self::Text(name) => Some(name.trim().to_string()).filter(|n| !n.is_empty()),
            Self::Fields(fields) => {
                let person = [fields.given_names.as_deref(), fields.family_names.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ");

                if person.is_empty() { fields.name.clone() } else { Some(person) }
            }
        }
    }

    fn affiliation(&self) -> Option<String> {
        match self {
            Self::Text(_) => None,
            Self::Fields(fields) => fields.affiliation.clone(),
        }
    }
}

impl From<CffDocument> for CitationData {
    fn from(document: CffDocument) -> Self {
        let authors = document
            .authors
            .iter()
            .filter_map(|author| {
                author.display_name().map(|name| CitationAuthor {
                    name,
                    affiliation: author.affiliation(),
                })
            })
            .collect();

        let preferred_citation = document.preferred_citation.map(|reference| PreferredCitation {
            kind: reference.kind.unwrap_or_default(),
            title: reference.title.unwrap_or_default(),
            authors: reference.authors.iter().filter_map(CffAuthor::display_name).collect(),
            journal: reference.journal,
            year: reference.year.and_then(|y| y.parse().ok()),
            doi: reference.doi,
        });

        Self {
            authors,
            title: document.title,
            version: document.version,
            doi: document.doi,
            date_released: document.date_released,
            repository_url: document.repository_code.or(document.repository_url),
            preferred_citation,
        }
    }
}

/// Accept any YAML scalar as text; blank values and non-scalars become `None`.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    use serde_yaml::Value;

    let value = Option::<Value>::deserialize(deserializer)?;
    let text = match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => return Ok(None),
    };

    let text = text.trim();
    Ok((!text.is_empty()).then(|| text.to_string()))
}
