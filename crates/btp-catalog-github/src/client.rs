use std::time::Duration;

use btp_catalog::{CrawlError, CrawlTarget, FileDescriptor, RawContent, RepoContents};
use log::{debug, warn};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};

use crate::contents::{RefResponse, parse_listing};
use crate::rate_limit::retry_delay;

const DEFAULT_API_BASE: &str = "https://api.github.com";
const CLIENT_USER_AGENT: &str = "btp-metadata-small-catalog/1.0";
const GITHUB_JSON: &str = "application/vnd.github+json";
const API_TIMEOUT: Duration = Duration::from_secs(30);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for a GitHub contents client.
#[derive(Debug, Clone, Default)]
pub struct GitHubClientConfig {
    pub target: CrawlTarget,
    pub token: Option<String>,
    pub api_base_url: Option<String>,
}

/// Which kind of GitHub endpoint a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    /// REST API: JSON accept header and, if configured, the bearer token.
    Api,
    /// Raw content download: User-Agent only.
    Raw,
}

/// Reads a repository folder through the GitHub REST Contents API.
///
/// Every request goes through the same single-retry rate-limit policy: an
/// exhausted quota sleeps until the advertised reset and tries once more;
/// any other failure status is returned immediately.
pub struct GitHubClient {
    config: GitHubClientConfig,
    client: reqwest::Client,
}

impl GitHubClient {
    pub fn new(config: GitHubClientConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn api_base(&self) -> &str {
        self.config
            .api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/')
    }

    fn contents_url(&self, path: &str) -> String {
        let target = &self.config.target;
        format!(
            "{}/repos/{}/{}/contents/{}?ref={}",
            self.api_base(),
            target.owner,
            target.repo,
            path.trim_matches('/'),
            target.branch,
        )
    }

    fn head_ref_url(&self) -> String {
        let target = &self.config.target;
        format!(
            "{}/repos/{}/{}/git/refs/heads/{}",
            self.api_base(),
            target.owner,
            target.repo,
            target.branch,
        )
    }

    fn build_request(&self, url: &str, endpoint: Endpoint) -> reqwest::RequestBuilder {
        let req = self.client.get(url).header(USER_AGENT, CLIENT_USER_AGENT);

        match endpoint {
            Endpoint::Raw => req.timeout(DOWNLOAD_TIMEOUT),
            Endpoint::Api => {
                let mut req = req.header(ACCEPT, GITHUB_JSON).timeout(API_TIMEOUT);
                if let Some(token) = &self.config.token {
                    req = req.header(AUTHORIZATION, format!("Bearer {token}"));
                }
                req
            }
        }
    }

    async fn send(&self, url: &str, endpoint: Endpoint) -> Result<reqwest::Response, CrawlError> {
        self.build_request(url, endpoint)
            .send()
            .await
            .map_err(|e| CrawlError::Network(format!("GET {url} failed: {e}")))
    }

    /// GET with the rate-limit policy applied.
    async fn get(&self, url: &str, endpoint: Endpoint) -> Result<reqwest::Response, CrawlError> {
        debug!("GET {url}");
        let mut response = self.send(url, endpoint).await?;

        let now = chrono::Utc::now().timestamp();
        if let Some(delay) = retry_delay(response.status(), response.headers(), now) {
            warn!("rate limited; sleeping {}s before retrying", delay.as_secs());
            tokio::time::sleep(delay).await;
            response = self.send(url, endpoint).await?;
        }

        if !response.status().is_success() {
            return Err(CrawlError::Http {
                url: url.to_owned(),
                status: response.status().as_u16(),
            });
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl RepoContents for GitHubClient {
    fn target(&self) -> &CrawlTarget {
        &self.config.target
    }

    async fn list_dir(&self, path: &str) -> Result<Vec<FileDescriptor>, CrawlError> {
        let payload: serde_json::Value = self
            .get(&self.contents_url(path), Endpoint::Api)
            .await?
            .json()
            .await
            .map_err(|e| CrawlError::Parse(e.to_string()))?;

        parse_listing(path, payload)
    }

    async fn head_sha(&self) -> Result<String, CrawlError> {
        let head: RefResponse = self
            .get(&self.head_ref_url(), Endpoint::Api)
            .await?
            .json()
            .await
            .map_err(|e| CrawlError::Parse(e.to_string()))?;

        Ok(head.object.sha)
    }

    async fn download(&self, url: &str) -> Result<RawContent, CrawlError> {
        let response = self.get(url, Endpoint::Raw).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CrawlError::Network(format!("failed to read body of {url}: {e}")))?;

        Ok(RawContent {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}
