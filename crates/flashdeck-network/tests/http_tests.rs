//! Integration tests for intercepted HTTP access

mod common;

use common::{Reply, TestServer};
use flashdeck_network::{
    AssetProbe, HttpAssetProbe, HttpClient, NetworkError, RedirectRule, Redirector,
};
use std::sync::Arc;
use std::time::Duration;

/// Client whose legacy host is redirected onto the local test server
fn legacy_client(server: &TestServer) -> HttpClient {
    let redirector = Redirector::new(vec![RedirectRule::new(
        "http://legacy.invalid/",
        server.base.clone(),
    )]);
    HttpClient::new(Arc::new(redirector), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_get_text_follows_redirect_rule() {
    let server = TestServer::start(Reply::Status(200, r#"{"games":[]}"#)).await;
    let client = legacy_client(&server);

    let body = client
        .get_text("http://legacy.invalid/games.json")
        .await
        .unwrap();

    assert_eq!(body, r#"{"games":[]}"#);
    assert_eq!(server.request_lines(), vec!["GET /games.json HTTP/1.1"]);
}

#[tokio::test]
async fn test_get_text_reports_status() {
    let server = TestServer::start(Reply::Status(500, "boom")).await;
    let client = legacy_client(&server);

    let err = client
        .get_text("http://legacy.invalid/games.json")
        .await
        .unwrap_err();

    assert!(matches!(err, NetworkError::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_probe_accepts_reachable_asset() {
    let server = TestServer::start(Reply::Status(200, "FWS")).await;
    let probe = HttpAssetProbe::new(legacy_client(&server), Duration::from_secs(2));

    probe.check("http://legacy.invalid/a.swf").await.unwrap();
    assert_eq!(server.request_lines(), vec!["HEAD /a.swf HTTP/1.1"]);
}

#[tokio::test]
async fn test_probe_rejects_missing_asset() {
    let server = TestServer::start(Reply::Status(404, "")).await;
    let probe = HttpAssetProbe::new(legacy_client(&server), Duration::from_secs(2));

    let err = probe.check("http://legacy.invalid/a.swf").await.unwrap_err();
    assert!(matches!(err, NetworkError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_probe_times_out() {
    let server = TestServer::start(Reply::Hang).await;
    let probe = HttpAssetProbe::new(legacy_client(&server), Duration::from_millis(200));

    let err = probe.check("http://legacy.invalid/a.swf").await.unwrap_err();
    assert!(matches!(err, NetworkError::Timeout(_)));
}
