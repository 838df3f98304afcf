//! Hub client tests against an in-process fake hub.

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use selgrid_core::{FetchError, GridApi};
use selgrid_fetch::{HubClient, MAX_BODY_BYTES};

async fn spawn_hub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// An address nothing listens on.
async fn closed_port() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

#[tokio::test]
async fn graphql_posts_json_query() {
    let router = Router::new().route(
        "/graphql",
        post(|headers: HeaderMap, body: String| async move {
            let content_type = headers
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            format!("{content_type}|{body}")
        }),
    );
    let uri = spawn_hub(router).await;

    let client = HubClient::new(&uri, GridApi::Graphql).unwrap();
    let body = client.fetch().await.unwrap();
    let body = String::from_utf8(body.to_vec()).unwrap();

    let (content_type, payload) = body.split_once('|').unwrap();
    assert_eq!(content_type, "application/json");
    let json: serde_json::Value = serde_json::from_str(payload).unwrap();
    assert_eq!(
        json["query"],
        "{ grid {totalSlots, maxSession, sessionCount, sessionQueueSize} }"
    );
}

#[tokio::test]
async fn hub_api_uses_get() {
    let router = Router::new().route(
        "/grid/api/hub",
        get(|| async { r#"{"slotCounts":{"free":1,"total":2}}"# }),
    );
    let uri = spawn_hub(router).await;

    let client = HubClient::new(&uri, GridApi::HubApi).unwrap();
    let body = client.fetch().await.unwrap();
    assert_eq!(&body[..], br#"{"slotCounts":{"free":1,"total":2}}"#);
}

#[tokio::test]
async fn non_success_status_still_returns_body() {
    let router = Router::new().route(
        "/graphql",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "hub exploded") }),
    );
    let uri = spawn_hub(router).await;

    let client = HubClient::new(&uri, GridApi::GraphqlUsage).unwrap();
    let body = client.fetch().await.unwrap();
    assert_eq!(&body[..], b"hub exploded");
}

#[tokio::test]
async fn connection_refused_is_connect_error() {
    let uri = closed_port().await;
    let client = HubClient::new(&uri, GridApi::Graphql).unwrap();

    let err = client.fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::Connect { .. }), "got {err:?}");
}

#[tokio::test]
async fn slow_hub_times_out() {
    let router = Router::new().route(
        "/graphql",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "{}"
        }),
    );
    let uri = spawn_hub(router).await;

    let client =
        HubClient::with_timeout(&uri, GridApi::Graphql, Duration::from_millis(100)).unwrap();
    let err = client.fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::Timeout { .. }), "got {err:?}");
}

#[tokio::test]
async fn each_fetch_is_a_fresh_request() {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    let hits = Arc::new(AtomicU64::new(0));
    let counter = hits.clone();
    let router = Router::new().route(
        "/grid/api/hub",
        get(move || {
            let counter = counter.clone();
            async move { counter.fetch_add(1, Ordering::SeqCst).to_string() }
        }),
    );
    let uri = spawn_hub(router).await;

    let client = HubClient::new(&uri, GridApi::HubApi).unwrap();
    assert_eq!(&client.fetch().await.unwrap()[..], b"0");
    assert_eq!(&client.fetch().await.unwrap()[..], b"1");
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn oversized_body_is_http_error() {
    let router = Router::new().route(
        "/grid/api/hub",
        get(|| async { "x".repeat(MAX_BODY_BYTES + 1) }),
    );
    let uri = spawn_hub(router).await;

    let client = HubClient::new(&uri, GridApi::HubApi).unwrap();
    let err = client.fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::Http(_)), "got {err:?}");
}

#[tokio::test]
async fn body_at_the_limit_is_accepted() {
    let router = Router::new().route(
        "/grid/api/hub",
        get(|| async { "x".repeat(MAX_BODY_BYTES) }),
    );
    let uri = spawn_hub(router).await;

    let client = HubClient::new(&uri, GridApi::HubApi).unwrap();
    let body = client.fetch().await.unwrap();
    assert_eq!(body.len(), MAX_BODY_BYTES);
}
