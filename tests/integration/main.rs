//! Integration tests against a real listener.
//!
//! Each test binds the router to an ephemeral port on loopback and talks to
//! it over HTTP.
//!
//! Run with: cargo test --test integration

use std::net::SocketAddr;
use std::time::Duration;

use devops_info_service::api::{create_router, AppState};
use devops_info_service::runtime::ProcessClock;
use futures::future::join_all;
use reqwest::StatusCode;
use serde_json::Value;
use tokio::net::TcpListener;

/// Start the service and return its base URL.
async fn spawn_service() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = create_router(AppState::new(ProcessClock::start()));

    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    format!("http://{}", addr)
}

async fn get_json(url: &str) -> (StatusCode, Value) {
    let response = reqwest::get(url).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert_eq!(content_type, "application/json");
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_index_success() {
    let base = spawn_service().await;

    let (status, data) = get_json(&format!("{}/", base)).await;

    assert_eq!(status, StatusCode::OK);
    for key in ["service", "system", "runtime", "request", "endpoints"] {
        assert!(data.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(data["service"]["name"], "devops-info-service");
    assert_eq!(data["service"]["framework"], "Axum");
    assert!(data["system"]["hostname"].is_string());
    assert!(data["system"]["cpu_count"].as_u64().unwrap() >= 1);
    assert!(data["runtime"]["uptime_seconds"].is_u64());
    assert_eq!(data["request"]["client_ip"], "127.0.0.1");
}

#[tokio::test]
async fn test_forwarded_for_is_reported() {
    let base = spawn_service().await;

    let data: Value = reqwest::Client::new()
        .get(format!("{}/", base))
        .header("X-Forwarded-For", "198.51.100.4")
        .header("User-Agent", "integration-test")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(data["request"]["client_ip"], "198.51.100.4");
    assert_eq!(data["request"]["user_agent"], "integration-test");
}

#[tokio::test]
async fn test_health_success() {
    let base = spawn_service().await;

    let (status, data) = get_json(&format!("{}/health", base)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["status"], "healthy");
    assert!(data["timestamp"].is_string());
    assert!(data["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_health_uptime_is_non_decreasing() {
    let base = spawn_service().await;
    let url = format!("{}/health", base);

    let (_, first) = get_json(&url).await;
    tokio::time::sleep(Duration::from_millis(1100)).await;
    let (_, second) = get_json(&url).await;

    let first = first["uptime_seconds"].as_u64().unwrap();
    let second = second["uptime_seconds"].as_u64().unwrap();
    assert!(second >= first);
    assert!(second >= 1);
}

#[tokio::test]
async fn test_not_found() {
    let base = spawn_service().await;

    let (status, data) = get_json(&format!("{}/does-not-exist", base)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(data["error"], "Not Found");
    let endpoints = data["available_endpoints"].as_array().unwrap();
    assert!(endpoints.iter().any(|e| e == "/health"));
}

#[tokio::test]
async fn test_concurrent_requests() {
    let base = spawn_service().await;
    let client = reqwest::Client::new();

    let requests = (0..16).map(|i| {
        let client = client.clone();
        let url = if i % 2 == 0 {
            format!("{}/", base)
        } else {
            format!("{}/health", base)
        };
        async move { client.get(url).send().await.unwrap().status() }
    });

    let statuses = join_all(requests).await;
    assert!(statuses.iter().all(|s| *s == StatusCode::OK));
}
