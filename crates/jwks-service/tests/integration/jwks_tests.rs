//! Integration tests for key set publication
//!
//! Both JWKS routes serve the same document: every valid key in registry
//! order, and no expired key.

use chrono::Utc;
use jwks_service::repositories::signing_keys::KeyRegistry;
use jwks_test_utils::{
    expired_only_registry, test_signing_key, TestJwksServer, EXPIRED_KEY_ID, VALID_KEY_ID,
};
use reqwest::StatusCode;

const JWKS_PATHS: [&str; 2] = ["/.well-known/jwks.json", "/jwks"];

#[tokio::test]
async fn test_both_routes_serve_identical_documents() -> Result<(), anyhow::Error> {
    let server = TestJwksServer::spawn_seeded().await?;

    let well_known = server.fetch_jwks("/.well-known/jwks.json").await?;
    let legacy = server.fetch_jwks("/jwks").await?;

    assert_eq!(well_known, legacy);
    Ok(())
}

#[tokio::test]
async fn test_jwks_excludes_expired_keys() -> Result<(), anyhow::Error> {
    let server = TestJwksServer::spawn_seeded().await?;

    for path in JWKS_PATHS {
        let jwks = server.fetch_jwks(path).await?;
        let kids: Vec<&str> = jwks.keys.iter().map(|k| k.kid.as_str()).collect();

        assert_eq!(kids, vec![VALID_KEY_ID], "{path} should publish only the valid key");
        assert!(!kids.contains(&EXPIRED_KEY_ID));
    }

    Ok(())
}

#[tokio::test]
async fn test_jwks_entry_shape() -> Result<(), anyhow::Error> {
    let server = TestJwksServer::spawn_seeded().await?;

    let response = server
        .client()
        .get(format!("{}/.well-known/jwks.json", server.url()))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await?;
    let keys = body["keys"].as_array().expect("keys array");
    assert_eq!(keys.len(), 1);

    let entry = keys[0].as_object().expect("key object");
    let mut members: Vec<&str> = entry.keys().map(String::as_str).collect();
    members.sort_unstable();
    assert_eq!(members, vec!["alg", "e", "kid", "kty", "n", "use"]);

    assert_eq!(entry["kty"], "RSA");
    assert_eq!(entry["alg"], "RS256");
    assert_eq!(entry["use"], "sig");
    assert_eq!(entry["e"], "AQAB");

    let n = entry["n"].as_str().expect("n string");
    assert!(!n.is_empty());
    assert!(
        n.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
        "modulus must be unpadded base64url"
    );

    Ok(())
}

#[tokio::test]
async fn test_jwks_is_empty_without_valid_keys() -> Result<(), anyhow::Error> {
    let registry = expired_only_registry(Utc::now().timestamp()).await?;
    let server = TestJwksServer::spawn_with_registry(registry).await?;

    for path in JWKS_PATHS {
        let jwks = server.fetch_jwks(path).await?;
        assert!(jwks.keys.is_empty(), "{path} should be empty");
    }

    Ok(())
}

#[tokio::test]
async fn test_jwks_lists_valid_keys_in_insertion_order() -> Result<(), anyhow::Error> {
    let now = Utc::now().timestamp();
    let registry = KeyRegistry::new();
    registry
        .insert(test_signing_key(2, "second-fixture", now + 600, now)?)
        .await;
    registry
        .insert(test_signing_key(1, "expired-between", now - 600, now)?)
        .await;
    registry
        .insert(test_signing_key(1, "first-fixture", now + 3600, now)?)
        .await;

    let server = TestJwksServer::spawn_with_registry(registry).await?;
    let jwks = server.fetch_jwks("/jwks").await?;
    let kids: Vec<&str> = jwks.keys.iter().map(|k| k.kid.as_str()).collect();

    assert_eq!(kids, vec!["second-fixture", "first-fixture"]);
    Ok(())
}

#[tokio::test]
async fn test_jwks_fetch_does_not_mutate_registry() -> Result<(), anyhow::Error> {
    let server = TestJwksServer::spawn_seeded().await?;

    let first = server.fetch_jwks("/jwks").await?;
    let second = server.fetch_jwks("/.well-known/jwks.json").await?;
    let third = server.fetch_jwks("/jwks").await?;

    assert_eq!(first, second);
    assert_eq!(second, third);
    assert_eq!(server.registry().len().await, 2);
    Ok(())
}
