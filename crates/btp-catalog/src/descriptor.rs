use serde::{Deserialize, Serialize};

/// Kind of entry in a Contents API directory listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Dir,
    /// Symlinks, submodules and anything else the walker does not follow.
    #[serde(other)]
    Other,
}

/// Metadata for a single remote file or directory.
/// `GET /repos/{owner}/{repo}/contents/{path}` returns a list of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    #[serde(default)]
    pub sha: String,
    #[serde(default)]
    pub size: u64,
    pub download_url: Option<String>,
    pub html_url: Option<String>,
}

impl FileDescriptor {
    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Dir
    }

    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }

    /// Last path component, e.g. `service.json` for `v1/developer/service.json`.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// File name without its final extension.
    pub fn stem(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(idx) if idx > 0 => &name[..idx],
            _ => name,
        }
    }
}

/// Raw bytes of a downloaded file plus the declared `Content-Type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawContent {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}
