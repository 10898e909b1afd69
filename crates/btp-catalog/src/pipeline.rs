use log::{error, info, warn};

use crate::catalog::{Catalog, MergedEntries, ServiceListing};
use crate::descriptor::FileDescriptor;
use crate::extract::service_entry;
use crate::failure::FileFailure;
use crate::repo::{CrawlError, RepoContents};
use crate::resolve::resolve_entry;
use crate::target::CrawlOptions;
use crate::walk::crawl;

const PROGRESS_EVERY: usize = 50;

/// Crawl the target folder and inline every file's content.
///
/// Per-file failures are logged and skipped. Listing errors and the file
/// cap abort the whole run.
pub async fn build_merged(
    repo: &dyn RepoContents,
    options: &CrawlOptions,
) -> Result<Catalog<MergedEntries>, CrawlError> {
    let head_sha = head_sha(repo).await;
    let files = crawl_target(repo, Some(options.max_files)).await?;
    let total = files.len();

    let mut entries = Vec::with_capacity(total);
    let mut errors = 0usize;

    for (i, file) in files.iter().enumerate() {
        match resolve_entry(repo, file, options.max_content_bytes).await {
            Ok(entry) => entries.push(entry),
            Err(failure) => {
                report(&failure);
                errors += 1;
            }
        }
        progress(i + 1, total);
    }

    info!("merged {} files ({errors} errors)", entries.len());

    Ok(Catalog::new(
        repo.target(),
        head_sha,
        MergedEntries { entries },
    ))
}

/// Crawl the target folder and build the small service catalog.
///
/// Only `.json` files with both a download and an HTML URL are considered;
/// anything else is skipped without counting as an error.
pub async fn build_services(
    repo: &dyn RepoContents,
) -> Result<Catalog<ServiceListing>, CrawlError> {
    let head_sha = head_sha(repo).await;
    let files = crawl_target(repo, None).await?;
    let total = files.len();

    let mut services = Vec::new();
    let mut errors = 0usize;

    for (i, file) in files.iter().enumerate() {
        if is_service_document(file) {
            match service_entry(repo, file).await {
                Ok(entry) => services.push(entry),
                Err(failure) => {
                    report(&failure);
                    errors += 1;
                }
            }
        }
        progress(i + 1, total);
    }

    info!("extracted {} services ({errors} errors)", services.len());

    Ok(Catalog::new(
        repo.target(),
        head_sha,
        ServiceListing::new(services, errors),
    ))
}

fn is_service_document(file: &FileDescriptor) -> bool {
    file.path.ends_with(".json") && file.download_url.is_some() && file.html_url.is_some()
}

async fn head_sha(repo: &dyn RepoContents) -> Option<String> {
    match repo.head_sha().await {
        Ok(sha) => Some(sha),
        Err(e) => {
            warn!("could not resolve head of {}: {e}", repo.target().branch);
            None
        }
    }
}

async fn crawl_target(
    repo: &dyn RepoContents,
    max_files: Option<usize>,
) -> Result<Vec<FileDescriptor>, CrawlError> {
    info!("crawling {}", repo.target());
    let files = crawl(repo, &repo.target().start_path, max_files).await?;
    info!("found {} files", files.len());
    Ok(files)
}

fn report(failure: &FileFailure) {
    error!("{failure}");
}

fn progress(done: usize, total: usize) {
    if done % PROGRESS_EVERY == 0 {
        info!("progress {done}/{total}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EntryContent;
    use crate::test_support::InMemoryRepo;

    const SMALL_LIMIT: usize = 64;

    fn options() -> CrawlOptions {
        CrawlOptions {
            max_files: 100,
            max_content_bytes: SMALL_LIMIT,
        }
    }

    /// Three levels, five files: two JSON documents, two small binaries and
    /// one binary over the size ceiling.
    fn three_level_repo() -> InMemoryRepo {
        let mut repo = InMemoryRepo::new("v1/developer");
        repo.add_file("v1/developer/a.json", br#"{"name":"a"}"#);
        repo.add_file("v1/developer/icons/logo.png", &[0x89, b'P', b'N', b'G']);
        repo.add_file("v1/developer/icons/deep/b.json", br#"{"name":"b"}"#);
        repo.add_file("v1/developer/icons/deep/blob.bin", &[0u8, 1, 2, 3]);
        repo.add_file("v1/developer/icons/deep/huge.bin", &[7u8; SMALL_LIMIT + 1]);
        repo
    }

    #[tokio::test]
    async fn merged_catalog_scenario() {
        let repo = three_level_repo();
        let catalog = build_merged(&repo, &options()).await.unwrap();
        let entries = &catalog.body.entries;

        assert_eq!(entries.len(), 5);
        assert_eq!(entries.iter().filter(|e| e.body.is_text()).count(), 2);
        assert_eq!(entries.iter().filter(|e| e.body.is_omitted()).count(), 1);
        assert_eq!(entries.iter().filter(|e| e.body.is_base64()).count(), 2);

        let a = entries
            .iter()
            .find(|e| e.path == "v1/developer/a.json")
            .unwrap();
        assert_eq!(a.body, EntryContent::Text(r#"{"name":"a"}"#.into()));

        let huge = entries.iter().find(|e| e.path.ends_with("huge.bin")).unwrap();
        assert_eq!(huge.downloaded_size, (SMALL_LIMIT + 1) as u64);
    }

    #[tokio::test]
    async fn merged_catalog_records_source() {
        let repo = three_level_repo();
        let catalog = build_merged(&repo, &options()).await.unwrap();

        assert_eq!(catalog.source.owner, "SAP-samples");
        assert_eq!(catalog.source.start_path, "v1/developer");
        assert_eq!(
            catalog.source.head_sha.as_deref(),
            Some("0000000000000000000000000000000000000000")
        );
    }

    #[tokio::test]
    async fn merged_catalog_skips_failed_downloads() {
        let mut repo = three_level_repo();
        repo.fail_download("v1/developer/a.json");

        let catalog = build_merged(&repo, &options()).await.unwrap();
        assert_eq!(catalog.body.entries.len(), 4);
        assert!(
            catalog
                .body
                .entries
                .iter()
                .all(|e| e.path != "v1/developer/a.json")
        );
    }

    #[tokio::test]
    async fn merged_catalog_enforces_file_cap() {
        let repo = three_level_repo();
        let capped = CrawlOptions {
            max_files: 3,
            ..options()
        };

        let result = build_merged(&repo, &capped).await;
        assert!(matches!(result, Err(CrawlError::TooManyFiles { limit: 3 })));
    }

    #[tokio::test]
    async fn missing_head_sha_is_not_fatal() {
        let mut repo = three_level_repo();
        repo.set_head_sha(None);

        let catalog = build_services(&repo).await.unwrap();
        assert_eq!(catalog.source.head_sha, None);
    }

    #[tokio::test]
    async fn service_catalog_counts_only_json_documents() {
        let repo = three_level_repo();
        let catalog = build_services(&repo).await.unwrap();

        assert_eq!(catalog.body.count, 2);
        assert_eq!(catalog.body.errors, 0);
        assert_eq!(catalog.body.services.len(), catalog.body.count);

        let mut names: Vec<&str> = catalog
            .body
            .services
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        names.sort_unstable();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn service_catalog_counts_parse_and_download_errors() {
        let mut repo = three_level_repo();
        repo.add_file("v1/developer/broken.json", b"{ nope");
        repo.add_file("v1/developer/gone.json", b"{}");
        repo.fail_download("v1/developer/gone.json");

        let catalog = build_services(&repo).await.unwrap();
        assert_eq!(catalog.body.count, 2);
        assert_eq!(catalog.body.errors, 2);
    }

    #[tokio::test]
    async fn service_catalog_has_no_file_cap() {
        let mut repo = InMemoryRepo::new("v1/developer");
        for i in 0..5 {
            repo.add_file(&format!("v1/developer/s{i}.json"), b"{}");
        }
        let catalog = build_services(&repo).await.unwrap();
        assert_eq!(catalog.body.count, 5);
    }

    #[tokio::test]
    async fn structural_error_aborts_service_catalog() {
        let mut repo = InMemoryRepo::new("v1/developer");
        repo.add_file("v1/developer", b"{}");

        let result = build_services(&repo).await;
        assert!(matches!(result, Err(CrawlError::NotADirectory { .. })));
    }
}
