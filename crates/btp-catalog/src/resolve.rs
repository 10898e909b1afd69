use base64::Engine;

use crate::catalog::{CatalogEntry, EntryContent};
use crate::descriptor::FileDescriptor;
use crate::failure::FileFailure;
use crate::repo::RepoContents;

const TEXT_EXTENSIONS: &[&str] = &["json", "yaml", "yml", "md", "txt", "csv", "xml"];

const STRUCTURED_TEXT_TYPES: &[&str] = &[
    "application/json",
    "application/xml",
    "application/yaml",
    "application/x-yaml",
    "application/javascript",
    "application/toml",
];

/// Decide whether a file should be stored as text.
///
/// Text wins if the extension is on the allow-list, the declared content
/// type is `text/*` or a structured text type, or a guess from the file
/// name says `text/*`. Everything else is binary.
pub fn is_text(path: &str, content_type: Option<&str>) -> bool {
    let extension = path
        .rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    if extension
        .as_deref()
        .is_some_and(|ext| TEXT_EXTENSIONS.contains(&ext))
    {
        return true;
    }

    if let Some(declared) = content_type {
        let essence = declared
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if essence.starts_with("text/") || STRUCTURED_TEXT_TYPES.contains(&essence.as_str()) {
            return true;
        }
    }

    mime_guess::from_path(path)
        .first_raw()
        .is_some_and(|guess| guess.starts_with("text/"))
}

/// Placeholder stored instead of a payload over the size ceiling.
pub fn omitted_note(size: usize, max_bytes: usize) -> String {
    format!("omitted: {size} bytes exceeds the {max_bytes}-byte limit")
}

/// Turn downloaded bytes into the stored representation.
///
/// Oversized payloads are never stored, not even partially.
pub fn encode_content(
    path: &str,
    bytes: &[u8],
    content_type: Option<&str>,
    max_bytes: usize,
) -> EntryContent {
    if bytes.len() > max_bytes {
        return EntryContent::Omitted(omitted_note(bytes.len(), max_bytes));
    }

    if is_text(path, content_type) {
        EntryContent::Text(String::from_utf8_lossy(bytes).into_owned())
    } else {
        EntryContent::Base64(base64::engine::general_purpose::STANDARD.encode(bytes))
    }
}

/// Download one file and build its merged-catalog entry.
pub async fn resolve_entry(
    repo: &dyn RepoContents,
    descriptor: &FileDescriptor,
    max_bytes: usize,
) -> Result<CatalogEntry, FileFailure> {
    let raw_url = descriptor
        .download_url
        .as_deref()
        .ok_or_else(|| FileFailure::missing_url(&descriptor.path))?;

    let raw = repo
        .download(raw_url)
        .await
        .map_err(|e| FileFailure::download(&descriptor.path, e.to_string()))?;

    let body = encode_content(
        &descriptor.path,
        &raw.bytes,
        raw.content_type.as_deref(),
        max_bytes,
    );

    Ok(CatalogEntry {
        path: descriptor.path.clone(),
        sha: descriptor.sha.clone(),
        declared_size: descriptor.size,
        downloaded_size: raw.bytes.len() as u64,
        raw_url: raw_url.to_owned(),
        html_url: descriptor.html_url.clone(),
        content_type: raw.content_type,
        body,
    })
}
