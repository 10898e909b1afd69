use crate::descriptor::{FileDescriptor, RawContent};
use crate::target::CrawlTarget;

/// Errors that abort a crawl or a single remote call.
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u16 },

    #[error("network error: {0}")]
    Network(String),

    #[error("expected a directory listing for '{path}', got {found}")]
    NotADirectory { path: String, found: String },

    #[error("crawl exceeded the limit of {limit} files")]
    TooManyFiles { limit: usize },

    #[error("parse error: {0}")]
    Parse(String),
}

/// Read access to the contents of a remote repository.
///
/// The GitHub client implements this over HTTP; tests use an in-memory tree.
#[async_trait::async_trait]
pub trait RepoContents: Send + Sync {
    /// The repository folder this source is bound to.
    fn target(&self) -> &CrawlTarget;

    /// List the immediate children of a directory.
    async fn list_dir(&self, path: &str) -> Result<Vec<FileDescriptor>, CrawlError>;

    /// Commit SHA at the head of the target branch.
    async fn head_sha(&self) -> Result<String, CrawlError>;

    /// Download the raw bytes behind a descriptor's `download_url`.
    async fn download(&self, url: &str) -> Result<RawContent, CrawlError>;
}
