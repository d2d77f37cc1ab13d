//! Integration tests for health probes and the metrics endpoint

use chrono::Utc;
use jwks_test_utils::{expired_only_registry, TestJwksServer};
use reqwest::StatusCode;

#[tokio::test]
async fn test_health_endpoint_returns_ok() -> Result<(), anyhow::Error> {
    let server = TestJwksServer::spawn_seeded().await?;

    let response = server
        .client()
        .get(format!("{}/health", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await?, "OK");
    Ok(())
}

#[tokio::test]
async fn test_ready_endpoint_with_valid_key() -> Result<(), anyhow::Error> {
    let server = TestJwksServer::spawn_seeded().await?;

    let response = server
        .client()
        .get(format!("{}/ready", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["signing_key"], "available");
    Ok(())
}

#[tokio::test]
async fn test_ready_endpoint_without_valid_key() -> Result<(), anyhow::Error> {
    let registry = expired_only_registry(Utc::now().timestamp()).await?;
    let server = TestJwksServer::spawn_with_registry(registry).await?;

    let response = server
        .client()
        .get(format!("{}/ready", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["status"], "not_ready");
    assert_eq!(body["signing_key"], "unavailable");

    // Liveness is unaffected
    let response = server
        .client()
        .get(format!("{}/health", server.url()))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_metrics_endpoint_serves_text() -> Result<(), anyhow::Error> {
    let server = TestJwksServer::spawn_seeded().await?;

    server.request_token(false).await?;

    let response = server
        .client()
        .get(format!("{}/metrics", server.url()))
        .send()
        .await?;

    // The exporter may be a standalone recorder when another test installed
    // the global one first, so only the status is stable here.
    assert_eq!(response.status(), StatusCode::OK);
    response.text().await?;
    Ok(())
}
