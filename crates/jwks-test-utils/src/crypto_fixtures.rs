//! Fixed RSA fixtures for testing
//!
//! 2048-bit RSA generation is slow, so tests load two pre-generated PKCS#1
//! keys instead. Records built from them carry fixed key ids.

use jwks_service::models::SigningKey;
use jwks_service::repositories::signing_keys::KeyRegistry;
use jwks_service::services::key_management_service::KEY_LIFETIME_SECONDS;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::RsaPrivateKey;
use thiserror::Error;

const TEST_RSA_KEY_1_PEM: &str = include_str!("../fixtures/test_rsa_key_1.pem");
const TEST_RSA_KEY_2_PEM: &str = include_str!("../fixtures/test_rsa_key_2.pem");

/// Key id of the valid fixture record.
pub const VALID_KEY_ID: &str = "test-key-valid";

/// Key id of the expired fixture record.
pub const EXPIRED_KEY_ID: &str = "test-key-expired";

/// Test fixture error type
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Unknown fixture key index: {0}")]
    UnknownKey(u8),

    #[error("Cryptographic operation failed: {0}")]
    Crypto(String),
}

/// Load fixture RSA key `index` (1 or 2).
///
/// # Example
/// ```rust,ignore
/// let key = test_rsa_key(1)?;
/// assert_eq!(key, test_rsa_key(1)?);
/// ```
pub fn test_rsa_key(index: u8) -> Result<RsaPrivateKey, FixtureError> {
    let pem = match index {
        1 => TEST_RSA_KEY_1_PEM,
        2 => TEST_RSA_KEY_2_PEM,
        other => return Err(FixtureError::UnknownKey(other)),
    };

    RsaPrivateKey::from_pkcs1_pem(pem)
        .map_err(|e| FixtureError::Crypto(format!("Failed to parse fixture key: {}", e)))
}

/// Build a signing key record from fixture key `index`.
pub fn test_signing_key(
    index: u8,
    key_id: &str,
    expires_at: i64,
    created_at: i64,
) -> Result<SigningKey, FixtureError> {
    let private_key = test_rsa_key(index)?;
    SigningKey::from_rsa_private_key(key_id, &private_key, expires_at, created_at)
        .map_err(|e| FixtureError::Crypto(e.to_string()))
}

fn valid_fixture(now: i64) -> Result<SigningKey, FixtureError> {
    test_signing_key(1, VALID_KEY_ID, now + KEY_LIFETIME_SECONDS, now)
}

fn expired_fixture(now: i64) -> Result<SigningKey, FixtureError> {
    test_signing_key(2, EXPIRED_KEY_ID, now - KEY_LIFETIME_SECONDS, now)
}

/// Registry holding one valid and one expired fixture key, in that order.
///
/// Mirrors the startup seeding without generating keys.
pub async fn seeded_registry(now: i64) -> Result<KeyRegistry, FixtureError> {
    let registry = KeyRegistry::new();
    registry.insert(valid_fixture(now)?).await;
    registry.insert(expired_fixture(now)?).await;
    Ok(registry)
}

/// Registry holding only the valid fixture key.
pub async fn valid_only_registry(now: i64) -> Result<KeyRegistry, FixtureError> {
    let registry = KeyRegistry::new();
    registry.insert(valid_fixture(now)?).await;
    Ok(registry)
}

/// Registry holding only the expired fixture key.
pub async fn expired_only_registry(now: i64) -> Result<KeyRegistry, FixtureError> {
    let registry = KeyRegistry::new();
    registry.insert(expired_fixture(now)?).await;
    Ok(registry)
}
