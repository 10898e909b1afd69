use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Errors from writing or reading a catalog file.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("failed to serialize catalog: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

fn io_error(path: &Path, source: std::io::Error) -> WriteError {
    WriteError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Write `catalog` as indented JSON, replacing any existing file.
///
/// Keys follow struct field order and non-ASCII text is written as-is.
pub fn write_catalog<T: Serialize>(path: &Path, catalog: &T) -> Result<(), WriteError> {
    let json = serde_json::to_string_pretty(catalog)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    std::fs::write(path, json).map_err(|e| io_error(path, e))
}

/// Read a catalog previously written by [`write_catalog`].
pub fn read_catalog<T: DeserializeOwned>(path: &Path) -> Result<T, WriteError> {
    let contents = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    Ok(serde_json::from_str(&contents)?)
}
