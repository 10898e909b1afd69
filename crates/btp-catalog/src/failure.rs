/// What went wrong while processing a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The descriptor carried no usable download URL.
    MissingUrl,
    /// The raw download failed.
    Download,
    /// The downloaded document could not be parsed.
    Parse,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::MissingUrl => "missing url",
            Self::Download => "download",
            Self::Parse => "parse",
        };
        f.write_str(label)
    }
}

/// A per-file failure. Pipelines count these and carry on with the next file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: String,
    pub kind: FailureKind,
    pub message: String,
}

impl FileFailure {
    pub fn new(path: impl Into<String>, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }

    pub fn missing_url(path: impl Into<String>) -> Self {
        Self::new(path, FailureKind::MissingUrl, "no download_url in listing")
    }

    pub fn download(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, FailureKind::Download, message)
    }

    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, FailureKind::Parse, message)
    }
}

impl std::fmt::Display for FileFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} error: {}", self.path, self.kind, self.message)
    }
}
