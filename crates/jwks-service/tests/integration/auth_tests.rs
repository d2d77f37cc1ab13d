//! Integration tests for token issuance over `/auth`

use chrono::Utc;
use jwks_service::services::token_service::{TOKEN_LIFETIME_SECONDS, TOKEN_SUBJECT};
use jwks_test_utils::{
    expired_only_registry, valid_only_registry, verify_with_jwks, TestJwksServer,
    TokenAssertions, EXPIRED_KEY_ID, VALID_KEY_ID,
};
use reqwest::StatusCode;

// ============================================================================
// Valid Tokens
// ============================================================================

#[tokio::test]
async fn test_valid_token_verifies_against_published_keys() -> Result<(), anyhow::Error> {
    let server = TestJwksServer::spawn_seeded().await?;

    let before = Utc::now().timestamp();
    let token = server.request_token(false).await?;
    let after = Utc::now().timestamp();

    token
        .assert_valid_jwt()
        .assert_signed_by(VALID_KEY_ID)
        .assert_for_subject(TOKEN_SUBJECT)
        .assert_not_expired();

    let jwks = server.fetch_jwks("/.well-known/jwks.json").await?;
    let claims = verify_with_jwks(&token, &jwks, true)?;

    assert!(claims.iat >= before && claims.iat <= after);
    assert_eq!(claims.exp, claims.iat + TOKEN_LIFETIME_SECONDS);
    Ok(())
}

#[tokio::test]
async fn test_generated_keys_issue_verifiable_tokens() -> Result<(), anyhow::Error> {
    let server = TestJwksServer::spawn().await?;

    let token = server.request_token(false).await?;
    token.assert_valid_jwt().assert_not_expired();

    let jwks = server.fetch_jwks("/jwks").await?;
    assert_eq!(jwks.keys.len(), 1);
    verify_with_jwks(&token, &jwks, true)?;
    Ok(())
}

#[tokio::test]
async fn test_non_true_expired_value_issues_valid_token() -> Result<(), anyhow::Error> {
    let server = TestJwksServer::spawn_seeded().await?;

    for query in ["?expired=false", "?expired=TRUE", "?expired=1", "?expired=", "?other=true"] {
        let response = server
            .client()
            .post(format!("{}/auth{}", server.url(), query))
            .send()
            .await?;
        assert_eq!(response.status(), StatusCode::OK, "query {query}");

        let body: serde_json::Value = response.json().await?;
        let token = body["token"].as_str().expect("token string");
        token.assert_signed_by(VALID_KEY_ID).assert_not_expired();
    }

    Ok(())
}

#[tokio::test]
async fn test_repeated_expired_param_issues_valid_token() -> Result<(), anyhow::Error> {
    let server = TestJwksServer::spawn_seeded().await?;

    for query in [
        "?expired=true&expired=false",
        "?expired=true&expired=true",
        "?expired=1&expired=2",
    ] {
        let response = server
            .client()
            .post(format!("{}/auth{}", server.url(), query))
            .send()
            .await?;
        assert_eq!(response.status(), StatusCode::OK, "query {query}");

        let body: serde_json::Value = response.json().await?;
        let token = body["token"].as_str().expect("token string");
        token.assert_signed_by(VALID_KEY_ID).assert_not_expired();
    }

    Ok(())
}

// ============================================================================
// Expired Tokens
// ============================================================================

#[tokio::test]
async fn test_expired_token_is_signed_by_unpublished_key() -> Result<(), anyhow::Error> {
    let server = TestJwksServer::spawn_seeded().await?;

    let token = server.request_token(true).await?;
    token
        .assert_valid_jwt()
        .assert_signed_by(EXPIRED_KEY_ID)
        .assert_for_subject(TOKEN_SUBJECT)
        .assert_expired();

    // A relying party cannot find the key
    let jwks = server.fetch_jwks("/.well-known/jwks.json").await?;
    assert!(jwks.keys.iter().all(|k| k.kid != EXPIRED_KEY_ID));
    assert!(verify_with_jwks(&token, &jwks, false).is_err());

    // The signature is still genuine
    let now = Utc::now().timestamp();
    let key = server
        .registry()
        .find_expired(now)
        .await
        .expect("expired fixture key");
    let claims = jwks_service::crypto::verify_jwt(&token, &key.modulus, &key.exponent, false)?;
    assert_eq!(claims.exp, claims.iat - TOKEN_LIFETIME_SECONDS);

    // Full validation rejects it
    assert!(jwks_service::crypto::verify_jwt(&token, &key.modulus, &key.exponent, true).is_err());
    Ok(())
}

// ============================================================================
// Missing Keys
// ============================================================================

#[tokio::test]
async fn test_expired_request_without_expired_key_is_404() -> Result<(), anyhow::Error> {
    let registry = valid_only_registry(Utc::now().timestamp()).await?;
    let server = TestJwksServer::spawn_with_registry(registry).await?;

    let response = server
        .client()
        .post(format!("{}/auth?expired=true", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "KEY_NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn test_valid_request_without_valid_key_is_404() -> Result<(), anyhow::Error> {
    let registry = expired_only_registry(Utc::now().timestamp()).await?;
    let server = TestJwksServer::spawn_with_registry(registry).await?;

    let response = server
        .client()
        .post(format!("{}/auth", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "KEY_NOT_FOUND");
    Ok(())
}

// ============================================================================
// Method Guard
// ============================================================================

#[tokio::test]
async fn test_auth_rejects_non_post_methods() -> Result<(), anyhow::Error> {
    let server = TestJwksServer::spawn_seeded().await?;
    let url = format!("{}/auth", server.url());

    for method in [
        reqwest::Method::GET,
        reqwest::Method::PUT,
        reqwest::Method::DELETE,
        reqwest::Method::PATCH,
    ] {
        let response = server
            .client()
            .request(method.clone(), &url)
            .send()
            .await?;
        assert_eq!(
            response.status(),
            StatusCode::METHOD_NOT_ALLOWED,
            "{method} /auth"
        );

        let body: serde_json::Value = response.json().await?;
        assert_eq!(body["error"]["code"], "METHOD_NOT_ALLOWED");
    }

    // Rejected requests do not touch the registry
    assert_eq!(server.registry().len().await, 2);
    Ok(())
}
