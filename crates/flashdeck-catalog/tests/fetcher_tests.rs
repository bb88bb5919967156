//! Integration tests for catalog download

mod common;

use common::{Reply, TestServer};
use flashdeck_catalog::{Catalog, CatalogError, CatalogFetch, HttpCatalogFetcher, resolve};
use flashdeck_network::{HttpClient, NetworkError, PassThrough, RedirectRule, Redirector};
use std::sync::Arc;
use std::time::Duration;

fn fetcher(server: &TestServer, max_retries: u32) -> HttpCatalogFetcher {
    let client = HttpClient::new(Arc::new(PassThrough), Duration::from_secs(5)).unwrap();
    HttpCatalogFetcher::new(
        client,
        format!("{}games.json", server.base),
        max_retries,
        Duration::from_millis(1),
    )
}

#[tokio::test]
async fn test_fetch_and_parse_catalog() {
    let server = TestServer::start(Reply::Status(
        200,
        r#"{"games":[{"id":"Aquanaut","name":"Aquanaut","path":"a.swf"}]}"#,
    ))
    .await;

    let body = fetcher(&server, 3).fetch().await.unwrap();
    let catalog = Catalog::parse(&body).unwrap();

    let resolution = resolve("aquanaut", &catalog).unwrap();
    assert_eq!(resolution.entry.asset_path, "a.swf");
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let server = TestServer::start(Reply::Status(503, "busy")).await;

    let err = fetcher(&server, 3).fetch().await.unwrap_err();

    match err {
        CatalogError::FetchFailed { attempts, source } => {
            assert_eq!(attempts, 3);
            assert!(matches!(source, NetworkError::Status { status: 503, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(server.request_lines().len(), 3);
}

#[tokio::test]
async fn test_missing_catalog_is_not_retried() {
    let server = TestServer::start(Reply::Status(404, "")).await;

    let err = fetcher(&server, 3).fetch().await.unwrap_err();

    assert!(matches!(err, CatalogError::FetchFailed { attempts: 1, .. }));
    assert_eq!(server.request_lines().len(), 1);
}

#[tokio::test]
async fn test_catalog_fetch_goes_through_redirector() {
    let server = TestServer::start(Reply::Status(200, r#"[{"id":"x","name":"X","src":"x.swf"}]"#)).await;
    let redirector = Redirector::new(vec![RedirectRule::new("https://jogos.ipv7.pt/", server.base.clone())]);
    let client = HttpClient::new(Arc::new(redirector), Duration::from_secs(5)).unwrap();
    let fetcher = HttpCatalogFetcher::new(client, "https://jogos.ipv7.pt/games.json", 1, Duration::ZERO);

    let body = fetcher.fetch().await.unwrap();

    assert!(body.contains("x.swf"));
    assert_eq!(server.request_lines(), vec!["GET /games.json HTTP/1.1"]);
}
