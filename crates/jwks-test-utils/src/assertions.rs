//! Custom assertions for JWT testing
//!
//! Provides the TokenAssertions trait for fluent checks on issued tokens,
//! plus [`verify_with_jwks`] for checking a signature against a fetched key
//! set the way a relying party would.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jwks_service::crypto::{self, Claims};
use jwks_service::models::Jwks;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct JwtHeader {
    alg: String,
    typ: Option<String>,
    kid: Option<String>,
}

/// Custom assertions for JWT tokens
pub trait TokenAssertions {
    /// Assert the token is a well-formed RS256 JWT with a `kid` header
    fn assert_valid_jwt(&self) -> &Self;

    /// Assert the token header names `key_id`
    fn assert_signed_by(&self, key_id: &str) -> &Self;

    /// Assert the token's `sub` claim
    fn assert_for_subject(&self, subject: &str) -> &Self;

    /// Assert `exp` is already in the past
    fn assert_expired(&self) -> &Self;

    /// Assert `exp` is still in the future
    fn assert_not_expired(&self) -> &Self;
}

fn decode_header(token: &str) -> JwtHeader {
    let part = token.split('.').next().expect("Empty JWT");
    let bytes = URL_SAFE_NO_PAD.decode(part).expect("Invalid JWT header");
    serde_json::from_slice(&bytes).expect("Failed to parse JWT header")
}

fn decode_claims(token: &str) -> Claims {
    let part = token.split('.').nth(1).expect("JWT has no payload");
    let bytes = URL_SAFE_NO_PAD.decode(part).expect("Invalid JWT payload");
    serde_json::from_slice(&bytes).expect("Failed to parse JWT claims")
}

impl<T: AsRef<str> + ?Sized> TokenAssertions for T {
    fn assert_valid_jwt(&self) -> &Self {
        let token = self.as_ref();
        let parts: Vec<_> = token.split('.').collect();
        assert_eq!(
            parts.len(),
            3,
            "JWT must have 3 parts (header.payload.signature), got {}",
            parts.len()
        );

        let header = decode_header(token);
        assert_eq!(header.alg, "RS256", "Expected RS256 algorithm");
        assert_eq!(header.typ.as_deref(), Some("JWT"), "Expected JWT type");
        assert!(header.kid.is_some(), "JWT header has no kid");

        decode_claims(token);

        self
    }

    fn assert_signed_by(&self, key_id: &str) -> &Self {
        let header = decode_header(self.as_ref());
        assert_eq!(
            header.kid.as_deref(),
            Some(key_id),
            "Expected key_id '{}', got {:?}",
            key_id,
            header.kid
        );

        self
    }

    fn assert_for_subject(&self, subject: &str) -> &Self {
        let claims = decode_claims(self.as_ref());
        assert_eq!(
            claims.sub, subject,
            "Expected subject '{}', got '{}'",
            subject, claims.sub
        );

        self
    }

    fn assert_expired(&self) -> &Self {
        let claims = decode_claims(self.as_ref());
        let now = chrono::Utc::now().timestamp();
        assert!(
            claims.exp < now,
            "Expected token to be expired, but exp {} is not before now {}",
            claims.exp,
            now
        );

        self
    }

    fn assert_not_expired(&self) -> &Self {
        let claims = decode_claims(self.as_ref());
        let now = chrono::Utc::now().timestamp();
        assert!(
            claims.exp > now,
            "Expected token to be live, but exp {} is not after now {}",
            claims.exp,
            now
        );

        self
    }
}

/// Verify `token` against the key in `jwks` named by its `kid` header.
///
/// Fails when no published key matches, which is the expected outcome for
/// tokens signed by an expired key.
pub fn verify_with_jwks(
    token: &str,
    jwks: &Jwks,
    validate_exp: bool,
) -> Result<Claims, anyhow::Error> {
    let header = jsonwebtoken::decode_header(token)?;
    let kid = header
        .kid
        .ok_or_else(|| anyhow::anyhow!("token header has no kid"))?;

    let jwk = jwks
        .keys
        .iter()
        .find(|k| k.kid == kid)
        .ok_or_else(|| anyhow::anyhow!("no published key with kid '{}'", kid))?;

    Ok(crypto::verify_jwt(token, &jwk.n, &jwk.e, validate_exp)?)
}
