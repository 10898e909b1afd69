use std::path::Path;

use anyhow::{Context, Result};
use btp_catalog::{RepoContents, build_services, write_catalog};
use log::info;

/// Build the small service catalog and write it to `output`.
pub async fn run(repo: &dyn RepoContents, output: &Path) -> Result<()> {
    let catalog = build_services(repo)
        .await
        .with_context(|| format!("crawl of {} failed", repo.target()))?;

    write_catalog(output, &catalog)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(
        "wrote {} with {} services (errors: {})",
        output.display(),
        catalog.body.count,
        catalog.body.errors
    );

    Ok(())
}
