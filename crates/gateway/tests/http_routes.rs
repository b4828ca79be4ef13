//! Plain HTTP routes, exercised with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use mb_domain::config::Config;
use mb_gateway::{api, bootstrap};
use mb_platform::RestPlatformClient;

fn app() -> axum::Router {
    let config = Config::default();
    let platform = RestPlatformClient::new(&config.platform, None).unwrap();
    let state = bootstrap::app_state_with_platform(Arc::new(config), Arc::new(platform));
    api::app(state)
}

async fn get(uri: &str) -> (StatusCode, Vec<u8>) {
    let resp = app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn root_without_upgrade_is_a_liveness_banner() {
    let (status, body) = get("/").await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    assert!(text.starts_with("makebridge "));
    assert!(text.contains("WebSocket"));
}

#[tokio::test]
async fn health_reports_tool_count() {
    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["tools"], 7);
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let (status, _) = get("/v1/anything").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
