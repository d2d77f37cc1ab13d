use crate::crypto;
use crate::errors::JwksError;
use crate::models::{Freshness, Jwks, JsonWebKey, SigningKey};
use crate::observability::metrics::record_key_generation;
use crate::repositories::signing_keys::KeyRegistry;
use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;

/// Keys expire one hour after (or, for seeded expired keys, one hour before)
/// the moment they are generated.
pub const KEY_LIFETIME_SECONDS: i64 = 3600;

/// Generate a new signing key, valid or already expired, and append it.
pub async fn generate_signing_key(
    registry: &KeyRegistry,
    expired: bool,
) -> Result<Arc<SigningKey>, JwksError> {
    generate_signing_key_at(registry, expired, Utc::now().timestamp()).await
}

/// Generate a new signing key relative to `now` and append it.
///
/// The RSA key pair is built on a blocking thread. The record only becomes
/// visible to readers once it is complete; nothing is appended on failure.
#[instrument(skip_all, name = "jwks.keys.generate", fields(key_state, status))]
pub async fn generate_signing_key_at(
    registry: &KeyRegistry,
    expired: bool,
    now: i64,
) -> Result<Arc<SigningKey>, JwksError> {
    let key_state = Freshness::requested(expired).as_str();
    tracing::Span::current().record("key_state", key_state);

    let result = build_signing_key(expired, now).await;

    let status = if result.is_ok() { "success" } else { "error" };
    tracing::Span::current().record("status", status);
    record_key_generation(key_state, status);

    let key = registry.insert(result?).await;

    tracing::info!(
        key_id = %key.key_id,
        expires_at = key.expires_at,
        key_state,
        "Signing key generated"
    );

    Ok(key)
}

async fn build_signing_key(expired: bool, now: i64) -> Result<SigningKey, JwksError> {
    let material = tokio::task::spawn_blocking(|| {
        let private_key = crypto::generate_rsa_private_key()?;
        crypto::export_key_material(&private_key)
    })
    .await
    .map_err(|e| JwksError::KeyGeneration(format!("Key generation task failed: {}", e)))??;

    let expires_at = if expired {
        now - KEY_LIFETIME_SECONDS
    } else {
        now + KEY_LIFETIME_SECONDS
    };

    Ok(SigningKey::new(
        crypto::generate_key_id(),
        material,
        expires_at,
        now,
    ))
}

/// Seed the registry with one valid and one already-expired key.
///
/// Makes expired-token issuance possible without waiting an hour.
pub async fn initialize_signing_keys(registry: &KeyRegistry) -> Result<(), JwksError> {
    generate_signing_key(registry, false).await?;
    generate_signing_key(registry, true).await?;
    Ok(())
}

/// Get JWKS (JSON Web Key Set) for public key distribution
///
/// Only keys valid at `now` are published, in registry order. Expired keys
/// stay usable for signing but are never discoverable.
pub async fn get_jwks(registry: &KeyRegistry, now: i64) -> Jwks {
    let keys: Vec<JsonWebKey> = registry
        .valid_keys(now)
        .await
        .iter()
        .map(|key| key.to_jwk())
        .collect();

    Jwks { keys }
}
