pub mod client;
pub mod contents;
pub mod rate_limit;

pub use client::{GitHubClient, GitHubClientConfig};
