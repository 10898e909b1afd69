use std::path::Path;

use anyhow::{Context, Result};
use btp_catalog::{CrawlOptions, RepoContents, build_merged, write_catalog};
use log::info;

/// Build the full-merge catalog and write it to `output`.
pub async fn run(repo: &dyn RepoContents, options: &CrawlOptions, output: &Path) -> Result<()> {
    let catalog = build_merged(repo, options)
        .await
        .with_context(|| format!("crawl of {} failed", repo.target()))?;

    write_catalog(output, &catalog)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(
        "wrote {} with {} entries",
        output.display(),
        catalog.body.entries.len()
    );

    Ok(())
}
