//! Best-effort field harvesting from service metadata documents.
//!
//! The documents do not follow one schema: links, deprecation flags and
//! their messages show up under different keys and at different levels.
//! Nothing here fails on a missing or oddly typed field; it just falls
//! through to the next candidate.

use log::warn;
use serde_json::Value;

use crate::catalog::ServiceEntry;
use crate::descriptor::FileDescriptor;
use crate::failure::FileFailure;
use crate::repo::RepoContents;

const DISCOVERY_CENTER: &str = "discovery center";
const DOCUMENTATION: &str = "documentation";

/// Deprecation state aggregated over the root object and its service plans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deprecation {
    pub deprecated: bool,
    pub message: Option<String>,
    pub date: Option<String>,
    /// Two deprecated service plans carried different messages or dates.
    pub conflicting: bool,
}

/// Pick the most useful external link for a service.
///
/// Tiers, first match wins within each: a `Discovery Center` link, a
/// `Documentation` link, any link with a value, then `fallback`.
pub fn pick_best_link(doc: &Value, fallback: &str) -> String {
    let links: Vec<&serde_json::Map<String, Value>> = doc
        .get("links")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_object).collect())
        .unwrap_or_default();

    let classified = |wanted: &str| {
        links.iter().find_map(|link| {
            let classification = link
                .get("classification")
                .and_then(Value::as_str)
                .unwrap_or_default();
            if classification.to_lowercase() == wanted {
                link_value(link)
            } else {
                None
            }
        })
    };

    classified(DISCOVERY_CENTER)
        .or_else(|| classified(DOCUMENTATION))
        .or_else(|| links.iter().find_map(|link| link_value(link)))
        .unwrap_or_else(|| fallback.to_owned())
}

fn link_value(link: &serde_json::Map<String, Value>) -> Option<String> {
    match link.get("value")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty(value: Option<&Value>) -> Option<String> {
    let trimmed = value?.as_str()?.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn first_non_empty(obj: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| non_empty(obj.get(key)))
}

/// Aggregate deprecation flags, messages and dates.
///
/// `deprecated` is true if a root `deprecated`/`isDeprecated` flag is true
/// or any service plan is deprecated. Message and date keep the first
/// non-empty value: root keys first, then deprecated plans in list order.
/// Only disagreement between plans sets `conflicting`; root values simply
/// take precedence.
pub fn aggregate_deprecation(doc: &Value) -> Deprecation {
    let mut deprecated = ["deprecated", "isDeprecated"]
        .iter()
        .any(|key| doc.get(key).and_then(Value::as_bool) == Some(true));
    let mut plan_message = None;
    let mut plan_date = None;
    let mut conflicting = false;

    let plans = doc
        .get("servicePlans")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for plan in plans.iter().filter(|p| p.is_object()) {
        if plan.get("deprecated").and_then(Value::as_bool) != Some(true) {
            continue;
        }
        deprecated = true;
        keep_first(
            &mut plan_message,
            non_empty(plan.get("deprecationMessage")),
            &mut conflicting,
        );
        keep_first(
            &mut plan_date,
            non_empty(plan.get("deprecationDate")),
            &mut conflicting,
        );
    }

    Deprecation {
        deprecated,
        message: first_non_empty(doc, &["deprecationMessage", "deprecatedMessage"])
            .or(plan_message),
        date: first_non_empty(doc, &["deprecationDate", "deprecatedDate"]).or(plan_date),
        conflicting,
    }
}

fn keep_first(slot: &mut Option<String>, candidate: Option<String>, conflicting: &mut bool) {
    let Some(candidate) = candidate else {
        return;
    };
    if slot.is_none() {
        *slot = Some(candidate);
    } else if slot.as_deref() != Some(candidate.as_str()) {
        *conflicting = true;
    }
}

/// Build a service entry from a parsed document.
///
/// `displayName` and `description` are copied as found, whatever their JSON
/// type.
pub fn extract_service(
    doc: &Value,
    descriptor: &FileDescriptor,
    raw_url: &str,
    html_url: &str,
) -> ServiceEntry {
    entry_from(doc, aggregate_deprecation(doc), descriptor, raw_url, html_url)
}

fn entry_from(
    doc: &Value,
    deprecation: Deprecation,
    descriptor: &FileDescriptor,
    raw_url: &str,
    html_url: &str,
) -> ServiceEntry {
    let name = doc
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| descriptor.stem())
        .to_owned();

    ServiceEntry {
        name,
        display_name: doc.get("displayName").cloned(),
        description: doc.get("description").cloned(),
        link: pick_best_link(doc, html_url),
        deprecated: deprecation.deprecated,
        deprecation_message: deprecation.message,
        deprecation_date: deprecation.date,
        path: descriptor.path.clone(),
        sha: descriptor.sha.clone(),
        raw_url: raw_url.to_owned(),
        html_url: html_url.to_owned(),
    }
}

/// Download one service document and extract its entry.
pub async fn service_entry(
    repo: &dyn RepoContents,
    descriptor: &FileDescriptor,
) -> Result<ServiceEntry, FileFailure> {
    let (Some(raw_url), Some(html_url)) = (
        descriptor.download_url.as_deref(),
        descriptor.html_url.as_deref(),
    ) else {
        return Err(FileFailure::missing_url(&descriptor.path));
    };

    let raw = repo
        .download(raw_url)
        .await
        .map_err(|e| FileFailure::download(&descriptor.path, e.to_string()))?;

    let text = String::from_utf8_lossy(&raw.bytes);
    let doc: Value = serde_json::from_str(&text)
        .map_err(|e| FileFailure::parse(&descriptor.path, e.to_string()))?;

    if !doc.is_object() {
        return Err(FileFailure::parse(
            &descriptor.path,
            "expected a JSON object at the top level",
        ));
    }

    let deprecation = aggregate_deprecation(&doc);
    if deprecation.conflicting {
        warn!(
            "{}: service plans disagree on deprecation message or date; keeping the first",
            descriptor.path
        );
    }

    Ok(entry_from(&doc, deprecation, descriptor, raw_url, html_url))
}
