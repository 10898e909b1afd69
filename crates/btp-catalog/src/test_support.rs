use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use crate::{CrawlError, CrawlTarget, EntryType, FileDescriptor, RawContent, RepoContents};

const DOWNLOAD_SCHEME: &str = "mem://";

#[derive(Debug, Clone)]
enum Node {
    Dir,
    File {
        bytes: Vec<u8>,
        content_type: Option<String>,
    },
    Other,
}

/// In-memory repository tree for testing. Paths are `/`-separated and
/// parents are created on demand.
pub struct InMemoryRepo {
    target: CrawlTarget,
    nodes: BTreeMap<String, Node>,
    head_sha: Option<String>,
    failing_downloads: HashSet<String>,
    listed: Mutex<Vec<String>>,
}

impl InMemoryRepo {
    pub fn new(start_path: impl Into<String>) -> Self {
        let target = CrawlTarget {
            start_path: start_path.into(),
            ..CrawlTarget::default()
        };
        let mut nodes = BTreeMap::new();
        nodes.insert(target.start_path.clone(), Node::Dir);

        Self {
            target,
            nodes,
            head_sha: Some("0000000000000000000000000000000000000000".into()),
            failing_downloads: HashSet::new(),
            listed: Mutex::new(Vec::new()),
        }
    }

    pub fn add_dir(&mut self, path: &str) {
        self.ensure_parents(path);
        self.nodes.insert(path.to_owned(), Node::Dir);
    }

    pub fn add_file(&mut self, path: &str, bytes: &[u8]) {
        self.insert_file(path, bytes, None);
    }

    pub fn add_file_with_type(&mut self, path: &str, bytes: &[u8], content_type: &str) {
        self.insert_file(path, bytes, Some(content_type.to_owned()));
    }

    /// Add a listing item of an unsupported type (symlink, submodule).
    pub fn add_other(&mut self, path: &str) {
        self.ensure_parents(path);
        self.nodes.insert(path.to_owned(), Node::Other);
    }

    /// Make downloads of `path` fail with HTTP 500.
    pub fn fail_download(&mut self, path: &str) {
        self.failing_downloads.insert(path.to_owned());
    }

    pub fn set_head_sha(&mut self, sha: Option<&str>) {
        self.head_sha = sha.map(|s| s.to_owned());
    }

    pub fn file_count(&self) -> usize {
        self.nodes
            .values()
            .filter(|n| matches!(n, Node::File { .. }))
            .count()
    }

    /// Directories passed to `list_dir`, in call order.
    pub fn listed_dirs(&self) -> Vec<String> {
        self.listed.lock().map(|l| l.to_vec()).unwrap_or_default()
    }

    pub fn html_url(path: &str) -> String {
        format!("https://github.example/blob/main/{path}")
    }

    pub fn download_url(path: &str) -> String {
        format!("{DOWNLOAD_SCHEME}{path}")
    }

    fn insert_file(&mut self, path: &str, bytes: &[u8], content_type: Option<String>) {
        self.ensure_parents(path);
        self.nodes.insert(
            path.to_owned(),
            Node::File {
                bytes: bytes.to_vec(),
                content_type,
            },
        );
    }

    fn ensure_parents(&mut self, path: &str) {
        let mut current = path;
        while let Some((parent, _)) = current.rsplit_once('/') {
            self.nodes.entry(parent.to_owned()).or_insert(Node::Dir);
            current = parent;
        }
    }

    fn descriptor(path: &str, node: &Node) -> FileDescriptor {
        let (entry_type, size, download_url) = match node {
            Node::Dir => (EntryType::Dir, 0, None),
            Node::File { bytes, .. } => (
                EntryType::File,
                bytes.len() as u64,
                Some(Self::download_url(path)),
            ),
            Node::Other => (EntryType::Other, 0, None),
        };

        FileDescriptor {
            path: path.to_owned(),
            entry_type,
            sha: format!("sha-{path}"),
            size,
            download_url,
            html_url: Some(Self::html_url(path)),
        }
    }
}

#[async_trait::async_trait]
impl RepoContents for InMemoryRepo {
    fn target(&self) -> &CrawlTarget {
        &self.target
    }

    async fn list_dir(&self, path: &str) -> Result<Vec<FileDescriptor>, CrawlError> {
        if let Ok(mut listed) = self.listed.lock() {
            listed.push(path.to_owned());
        }

        match self.nodes.get(path) {
            Some(Node::Dir) => {}
            Some(_) => {
                return Err(CrawlError::NotADirectory {
                    path: path.to_owned(),
                    found: "object".into(),
                });
            }
            None => {
                return Err(CrawlError::Http {
                    url: path.to_owned(),
                    status: 404,
                });
            }
        }

        let prefix = format!("{path}/");
        Ok(self
            .nodes
            .iter()
            .filter(|(p, _)| {
                p.strip_prefix(&prefix)
                    .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
            })
            .map(|(p, node)| Self::descriptor(p, node))
            .collect())
    }

    async fn head_sha(&self) -> Result<String, CrawlError> {
        self.head_sha
            .clone()
            .ok_or_else(|| CrawlError::Network("head ref unavailable".into()))
    }

    async fn download(&self, url: &str) -> Result<RawContent, CrawlError> {
        let not_found = || CrawlError::Http {
            url: url.to_owned(),
            status: 404,
        };
        let path = url.strip_prefix(DOWNLOAD_SCHEME).ok_or_else(not_found)?;

        if self.failing_downloads.contains(path) {
            return Err(CrawlError::Http {
                url: url.to_owned(),
                status: 500,
            });
        }

        match self.nodes.get(path) {
            Some(Node::File {
                bytes,
                content_type,
            }) => Ok(RawContent {
                bytes: bytes.clone(),
                content_type: content_type.clone(),
            }),
            _ => Err(not_found()),
        }
    }
}
