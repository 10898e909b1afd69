/// Owner of the crawled repository.
pub const OWNER: &str = "SAP-samples";
/// Name of the crawled repository.
pub const REPO: &str = "btp-service-metadata";
/// Branch the crawl reads from.
pub const BRANCH: &str = "main";
/// Folder the crawl starts from.
pub const START_PATH: &str = "v1/developer";

/// Upper bound on collected files for the full-merge crawl.
pub const DEFAULT_MAX_FILES: usize = 5000;
/// Downloads larger than this are replaced by a placeholder note.
pub const DEFAULT_MAX_CONTENT_BYTES: usize = 2_000_000;

/// Coordinates of the remote folder being crawled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub start_path: String,
}

impl Default for CrawlTarget {
    fn default() -> Self {
        Self {
            owner: OWNER.into(),
            repo: REPO.into(),
            branch: BRANCH.into(),
            start_path: START_PATH.into(),
        }
    }
}

impl std::fmt::Display for CrawlTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}@{}:{}",
            self.owner, self.repo, self.branch, self.start_path
        )
    }
}

/// Limits applied while building a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlOptions {
    pub max_files: usize,
    pub max_content_bytes: usize,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            max_content_bytes: DEFAULT_MAX_CONTENT_BYTES,
        }
    }
}
