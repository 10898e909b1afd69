pub mod catalog;
pub mod descriptor;
pub mod extract;
pub mod failure;
pub mod pipeline;
pub mod repo;
pub mod resolve;
pub mod target;
pub mod walk;
pub mod writer;

pub use catalog::{
    Catalog, CatalogEntry, EntryContent, MergedEntries, ServiceEntry, ServiceListing, SourceInfo,
};
pub use descriptor::{EntryType, FileDescriptor, RawContent};
pub use extract::{Deprecation, aggregate_deprecation, extract_service, pick_best_link};
pub use failure::{FailureKind, FileFailure};
pub use pipeline::{build_merged, build_services};
pub use repo::{CrawlError, RepoContents};
pub use resolve::{encode_content, is_text};
pub use target::{CrawlOptions, CrawlTarget};
pub use walk::crawl;
pub use writer::{WriteError, read_catalog, write_catalog};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
