use log::debug;

use crate::descriptor::{EntryType, FileDescriptor};
use crate::repo::{CrawlError, RepoContents};

/// Collect every file below `start_path`.
///
/// Directories are walked with an explicit stack, so the result order is
/// depth-first but otherwise unspecified. Symlinks and submodules are
/// skipped. With `max_files` set, the crawl fails as soon as more than that
/// many files have been collected.
pub async fn crawl(
    repo: &dyn RepoContents,
    start_path: &str,
    max_files: Option<usize>,
) -> Result<Vec<FileDescriptor>, CrawlError> {
    let mut files = Vec::new();
    let mut stack = vec![start_path.to_owned()];

    while let Some(dir) = stack.pop() {
        for item in repo.list_dir(&dir).await? {
            match item.entry_type {
                EntryType::Dir => stack.push(item.path),
                EntryType::File => {
                    files.push(item);
                    if let Some(limit) = max_files
                        && files.len() > limit
                    {
                        return Err(CrawlError::TooManyFiles { limit });
                    }
                }
                EntryType::Other => debug!("skipping {} (not a file or directory)", item.path),
            }
        }
    }

    Ok(files)
}
