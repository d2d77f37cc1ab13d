use crate::crypto::{self, Claims};
use crate::errors::JwksError;
use crate::models::Freshness;
use crate::observability::{record_operation_error, record_token_issuance};
use crate::repositories::signing_keys::KeyRegistry;
use std::time::Instant;
use tracing::instrument;

/// Issued tokens expire one hour after (or, when an expired token is
/// requested, one hour before) issuance. Kept separate from the key lifetime.
pub const TOKEN_LIFETIME_SECONDS: i64 = 3600;

/// Placeholder subject carried by every issued token.
pub const TOKEN_SUBJECT: &str = "username";

/// Issue a signed token whose freshness matches the request.
///
/// A valid request is signed with the first valid key and expires in the
/// future. An expired request is signed with the first expired key and its
/// `exp` is already in the past. The `kid` header always names the key that
/// produced the signature.
#[instrument(skip_all, name = "jwks.token.issue", fields(key_state, status))]
pub async fn issue_token(
    registry: &KeyRegistry,
    want_expired: bool,
    now: i64,
) -> Result<String, JwksError> {
    let start = Instant::now();
    let freshness = Freshness::requested(want_expired);
    tracing::Span::current().record("key_state", freshness.as_str());

    let result = sign_with_matching_key(registry, freshness, now).await;

    let status = if result.is_ok() { "success" } else { "error" };
    tracing::Span::current().record("status", status);
    record_token_issuance(freshness.as_str(), status, start.elapsed());
    if let Err(e) = &result {
        record_operation_error("issue_token", e);
    }

    result
}

async fn sign_with_matching_key(
    registry: &KeyRegistry,
    freshness: Freshness,
    now: i64,
) -> Result<String, JwksError> {
    let signing_key = registry
        .find_first(freshness, now)
        .await
        .ok_or(JwksError::NoKeyAvailable)?;

    let exp = match freshness {
        Freshness::Valid => now + TOKEN_LIFETIME_SECONDS,
        Freshness::Expired => now - TOKEN_LIFETIME_SECONDS,
    };

    let claims = Claims {
        sub: TOKEN_SUBJECT.to_string(),
        iat: now,
        exp,
    };

    tracing::debug!(key_id = %signing_key.key_id, "Signing token");

    crypto::sign_jwt(&claims, &signing_key.private_key_der, &signing_key.key_id)
}
