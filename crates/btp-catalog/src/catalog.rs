use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::target::CrawlTarget;

/// The single aggregated document produced by one pipeline run.
///
/// `body` is flattened, so a merged catalog serializes as
/// `{ generated_at_utc, source, entries }` and a service catalog as
/// `{ generated_at_utc, source, count, errors, services }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog<B> {
    pub generated_at_utc: String,
    pub source: SourceInfo,
    #[serde(flatten)]
    pub body: B,
}

impl<B> Catalog<B> {
    /// Stamp a freshly built body with the current UTC time and its source.
    pub fn new(target: &CrawlTarget, head_sha: Option<String>, body: B) -> Self {
        Self {
            generated_at_utc: chrono::Utc::now()
                .format("%Y-%m-%dT%H:%M:%SZ")
                .to_string(),
            source: SourceInfo::new(target, head_sha),
            body,
        }
    }
}

/// Where a catalog's entries came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub start_path: String,
    pub head_sha: Option<String>,
}

impl SourceInfo {
    pub fn new(target: &CrawlTarget, head_sha: Option<String>) -> Self {
        Self {
            owner: target.owner.clone(),
            repo: target.repo.clone(),
            branch: target.branch.clone(),
            start_path: target.start_path.clone(),
            head_sha,
        }
    }
}

/// Body of the full-merge catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MergedEntries {
    pub entries: Vec<CatalogEntry>,
}

/// Body of the small service catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceListing {
    pub count: usize,
    pub errors: usize,
    pub services: Vec<ServiceEntry>,
}

impl ServiceListing {
    pub fn new(services: Vec<ServiceEntry>, errors: usize) -> Self {
        Self {
            count: services.len(),
            errors,
            services,
        }
    }
}

/// One remote file with its content inlined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub path: String,
    pub sha: String,
    pub declared_size: u64,
    pub downloaded_size: u64,
    pub raw_url: String,
    pub html_url: Option<String>,
    pub content_type: Option<String>,
    #[serde(flatten)]
    pub body: EntryContent,
}

/// How a file's bytes are stored in a [`CatalogEntry`]. Exactly one of
/// the three keys appears in the serialized entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryContent {
    /// UTF-8 text, undecodable sequences replaced.
    #[serde(rename = "content")]
    Text(String),
    /// Binary payload, standard base64.
    #[serde(rename = "content_base64")]
    Base64(String),
    /// Placeholder note for a download over the size ceiling.
    #[serde(rename = "content_omitted")]
    Omitted(String),
}

impl EntryContent {
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    pub fn is_base64(&self) -> bool {
        matches!(self, Self::Base64(_))
    }

    pub fn is_omitted(&self) -> bool {
        matches!(self, Self::Omitted(_))
    }
}

/// Descriptive fields harvested from one service metadata document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub name: String,
    #[serde(rename = "displayName")]
    pub display_name: Option<Value>,
    pub description: Option<Value>,
    pub link: String,
    pub deprecated: bool,
    #[serde(rename = "deprecationMessage")]
    pub deprecation_message: Option<String>,
    #[serde(rename = "deprecationDate")]
    pub deprecation_date: Option<String>,
    pub path: String,
    pub sha: String,
    pub raw_url: String,
    pub html_url: String,
}
