use btp_catalog::{CrawlError, FileDescriptor};
use serde::Deserialize;
use serde_json::Value;

/// Response from GitHub's Git Refs API.
/// `GET /repos/{owner}/{repo}/git/refs/heads/{branch}`
#[derive(Debug, Deserialize)]
pub struct RefResponse {
    pub object: RefObject,
}

#[derive(Debug, Deserialize)]
pub struct RefObject {
    pub sha: String,
}

/// Interpret a Contents API payload as a directory listing.
///
/// The endpoint returns an array for directories and a single object for
/// files; anything but an array is a structural error here.
pub fn parse_listing(path: &str, payload: Value) -> Result<Vec<FileDescriptor>, CrawlError> {
    match payload {
        Value::Array(_) => {
            serde_json::from_value(payload).map_err(|e| CrawlError::Parse(e.to_string()))
        }
        other => Err(CrawlError::NotADirectory {
            path: path.to_owned(),
            found: json_type(&other).to_owned(),
        }),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
