use btp_catalog::{CrawlError, CrawlTarget, EntryType, RepoContents};
use btp_catalog_github::{GitHubClient, GitHubClientConfig};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONTENTS: &str = "/repos/SAP-samples/btp-service-metadata/contents";

fn client_for(server: &MockServer, token: Option<&str>) -> GitHubClient {
    GitHubClient::new(GitHubClientConfig {
        target: CrawlTarget::default(),
        token: token.map(str::to_owned),
        api_base_url: Some(server.uri()),
    })
}

fn file_item(server: &MockServer, path: &str, size: u64) -> serde_json::Value {
    json!({
        "name": path.rsplit('/').next().unwrap(),
        "path": path,
        "sha": format!("sha-{path}"),
        "size": size,
        "type": "file",
        "download_url": format!("{}/raw/{path}", server.uri()),
        "html_url": format!("https://github.com/SAP-samples/btp-service-metadata/blob/main/{path}"),
    })
}

fn dir_item(path: &str) -> serde_json::Value {
    json!({
        "name": path.rsplit('/').next().unwrap(),
        "path": path,
        "sha": format!("sha-{path}"),
        "size": 0,
        "type": "dir",
        "download_url": null,
        "html_url": format!("https://github.com/SAP-samples/btp-service-metadata/tree/main/{path}"),
    })
}

#[tokio::test]
async fn list_dir_returns_descriptors() {
    let server = MockServer::start().await;
    let listing = json!([
        file_item(&server, "v1/developer/a.json", 12),
        dir_item("v1/developer/nested"),
        { "path": "v1/developer/link", "type": "symlink", "sha": "s", "size": 4,
          "download_url": null, "html_url": null }
    ]);

    Mock::given(method("GET"))
        .and(path(format!("{CONTENTS}/v1/developer")))
        .and(query_param("ref", "main"))
        .and(header("accept", "application/vnd.github+json"))
        .and(header("user-agent", "btp-metadata-small-catalog/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let items = client.list_dir("v1/developer").await.unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].entry_type, EntryType::File);
    assert_eq!(items[0].size, 12);
    assert_eq!(items[1].entry_type, EntryType::Dir);
    assert_eq!(items[2].entry_type, EntryType::Other);
}

#[tokio::test]
async fn list_dir_rejects_single_file_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{CONTENTS}/v1/developer/a.json")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(file_item(&server, "v1/developer/a.json", 2)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let result = client.list_dir("v1/developer/a.json").await;

    assert!(matches!(result, Err(CrawlError::NotADirectory { .. })));
}

#[tokio::test]
async fn token_is_sent_to_the_api() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{CONTENTS}/v1/developer")))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("s3cret"));
    let items = client.list_dir("v1/developer").await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn raw_downloads_never_carry_the_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/raw/v1/developer/a.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"name":"a"}"#, "text/plain; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, Some("s3cret"));
    let raw = client
        .download(&format!("{}/raw/v1/developer/a.json", server.uri()))
        .await
        .unwrap();

    assert_eq!(raw.bytes, br#"{"name":"a"}"#);
    assert_eq!(raw.content_type.as_deref(), Some("text/plain; charset=utf-8"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
    assert_eq!(
        requests[0].headers.get("user-agent").unwrap(),
        "btp-metadata-small-catalog/1.0"
    );
}

#[tokio::test]
async fn head_sha_reads_ref_object() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(
            "/repos/SAP-samples/btp-service-metadata/git/refs/heads/main",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ref": "refs/heads/main",
            "object": { "sha": "c0ffee", "type": "commit" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    assert_eq!(client.head_sha().await.unwrap(), "c0ffee");
}

#[tokio::test]
async fn not_found_fails_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{CONTENTS}/v1/missing")))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let result = client.list_dir("v1/missing").await;

    assert!(matches!(result, Err(CrawlError::Http { status: 404, .. })));
}

#[tokio::test]
async fn forbidden_with_quota_left_fails_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{CONTENTS}/v1/developer")))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-remaining", "42")
                .set_body_string(r#"{"message":"Resource not accessible"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let result = client.list_dir("v1/developer").await;

    assert!(matches!(result, Err(CrawlError::Http { status: 403, .. })));
}

#[tokio::test]
async fn exhausted_quota_sleeps_and_retries_once() {
    let server = MockServer::start().await;

    // Reset in the past: the client waits the one-second minimum.
    Mock::given(method("GET"))
        .and(path(format!("{CONTENTS}/v1/developer")))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-remaining", "0")
                .insert_header("x-ratelimit-reset", "0"),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{CONTENTS}/v1/developer")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([dir_item("v1/developer/x")])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let started = std::time::Instant::now();
    let items = client.list_dir("v1/developer").await.unwrap();

    assert_eq!(items.len(), 1);
    assert!(started.elapsed() >= std::time::Duration::from_secs(1));
}

#[tokio::test]
async fn second_rate_limit_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{CONTENTS}/v1/developer")))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-remaining", "0")
                .insert_header("x-ratelimit-reset", "0"),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let result = client.list_dir("v1/developer").await;

    assert!(matches!(result, Err(CrawlError::Http { status: 403, .. })));
}

#[tokio::test]
async fn raw_download_failure_is_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/raw/v1/developer/gone.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let result = client
        .download(&format!("{}/raw/v1/developer/gone.json", server.uri()))
        .await;

    assert!(matches!(result, Err(CrawlError::Http { status: 500, .. })));
}

#[tokio::test]
async fn raw_download_retries_once_after_rate_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/raw/v1/developer/a.json"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-remaining", "0")
                .insert_header("x-ratelimit-reset", "0"),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/raw/v1/developer/a.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"name":"a"}"#, "text/plain"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("s3cret"));
    let raw = client
        .download(&format!("{}/raw/v1/developer/a.json", server.uri()))
        .await
        .unwrap();

    assert_eq!(raw.bytes, br#"{"name":"a"}"#);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(
        requests
            .iter()
            .all(|r| !r.headers.contains_key("authorization"))
    );
}
