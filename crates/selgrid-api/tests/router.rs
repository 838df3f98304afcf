//! Router tests: metrics path, redirects, and end-to-end scrapes.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::post;
use selgrid_api::build_router;
use selgrid_core::GridApi;
use selgrid_core::config::validate_metrics_path;
use selgrid_fetch::HubClient;
use selgrid_metrics::Exporter;
use tower::ServiceExt;

async fn spawn_hub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn closed_port() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn exporter(uri: &str, api: GridApi) -> Arc<Exporter> {
    let client = HubClient::with_timeout(uri, api, Duration::from_millis(300)).unwrap();
    Arc::new(Exporter::new(client))
}

async fn body_string(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn root_redirects_permanently_to_metrics() {
    let router = build_router(exporter(&closed_port().await, GridApi::Graphql), "/metrics");

    let resp = router.oneshot(get("/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(resp.headers().get("location").unwrap(), "/metrics");
}

#[tokio::test]
async fn unknown_paths_redirect_to_custom_metrics_path() {
    let router = build_router(exporter(&closed_port().await, GridApi::Graphql), "/grid/stats");

    for path in ["/", "/metrics", "/favicon.ico"] {
        let resp = router.clone().oneshot(get(path)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY, "path {path}");
        assert_eq!(resp.headers().get("location").unwrap(), "/grid/stats");
    }
}

#[tokio::test]
async fn metrics_path_serves_exposition() {
    let hub = Router::new().route(
        "/graphql",
        post(|| async { r#"{"data":{"grid":{"totalSlots":10,"usedSlots":3,"sessionCount":3}}}"# }),
    );
    let uri = spawn_hub(hub).await;
    let router = build_router(exporter(&uri, GridApi::GraphqlUsage), "/metrics");

    let resp = router.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
    assert_eq!(content_type, "text/plain; version=0.0.4; charset=utf-8");

    let body = body_string(resp).await;
    assert!(body.contains("# TYPE selenium_grid_up gauge\n"));
    assert!(body.contains("selenium_grid_up 1\n"));
    assert!(body.contains("selenium_grid_hub_totalSlots 10\n"));
    assert!(body.contains("selenium_grid_hub_usedSlots 3\n"));
    assert!(body.contains("selenium_grid_hub_sessionCount 3\n"));
}

#[tokio::test]
async fn unreachable_hub_still_answers_ok() {
    let router = build_router(exporter(&closed_port().await, GridApi::GraphqlUsage), "/metrics");

    let resp = router.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_string(resp).await;
    assert!(body.contains("selenium_grid_up 0\n"));
    assert!(body.contains("selenium_grid_hub_totalSlots 0\n"));
    assert!(body.contains("selenium_grid_hub_usedSlots 0\n"));
    assert!(body.contains("selenium_grid_hub_sessionCount 0\n"));
}

#[tokio::test]
async fn metrics_path_answers_any_method() {
    let router = build_router(exporter(&closed_port().await, GridApi::Graphql), "/metrics");

    for method in ["POST", "PUT", "HEAD"] {
        let req = Request::builder()
            .method(method)
            .uri("/metrics")
            .body(Body::empty())
            .unwrap();
        let resp = router.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "method {method}");
    }
}

#[tokio::test]
async fn single_segment_paths_still_redirect() {
    let path = validate_metrics_path("/metrics").unwrap();
    let router = build_router(exporter(&closed_port().await, GridApi::Graphql), &path);

    for uri in ["/foo", "/anything", "/metricsx"] {
        let resp = router.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY, "path {uri}");
        assert_eq!(resp.headers().get("location").unwrap(), "/metrics");
    }
}
