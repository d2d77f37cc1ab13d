use crate::crypto::{self, RsaKeyMaterial};
use crate::errors::JwksError;
use rsa::RsaPrivateKey;
use secrecy::SecretBox;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Freshness of a signing key at a given instant.
///
/// Exhaustive: a key with `expires_at > now` is valid, anything else is
/// expired. There is no "not yet active" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Valid,
    Expired,
}

impl Freshness {
    /// The freshness an issuance request asks for.
    pub fn requested(want_expired: bool) -> Self {
        if want_expired {
            Freshness::Expired
        } else {
            Freshness::Valid
        }
    }

    /// Metric label value
    pub fn as_str(&self) -> &'static str {
        match self {
            Freshness::Valid => "valid",
            Freshness::Expired => "expired",
        }
    }
}

/// In-memory signing key record.
///
/// Public parameters are stored pre-encoded for the JWKS projection. The
/// private key is only reachable through `private_key_der` and is not
/// serializable.
pub struct SigningKey {
    pub key_id: String,
    pub modulus: String,
    pub exponent: String,
    pub private_key_der: SecretBox<Vec<u8>>,
    pub expires_at: i64,
    pub created_at: i64,
}

impl SigningKey {
    pub fn new(key_id: String, material: RsaKeyMaterial, expires_at: i64, created_at: i64) -> Self {
        Self {
            key_id,
            modulus: material.modulus,
            exponent: material.exponent,
            private_key_der: material.private_key_der,
            expires_at,
            created_at,
        }
    }

    /// Build a record from existing RSA key material.
    pub fn from_rsa_private_key(
        key_id: impl Into<String>,
        private_key: &RsaPrivateKey,
        expires_at: i64,
        created_at: i64,
    ) -> Result<Self, JwksError> {
        let material = crypto::export_key_material(private_key)?;
        Ok(Self::new(key_id.into(), material, expires_at, created_at))
    }

    pub fn freshness(&self, now: i64) -> Freshness {
        if self.expires_at > now {
            Freshness::Valid
        } else {
            Freshness::Expired
        }
    }

    pub fn is_valid_at(&self, now: i64) -> bool {
        self.freshness(now) == Freshness::Valid
    }

    /// Public projection for the JWKS document.
    pub fn to_jwk(&self) -> JsonWebKey {
        JsonWebKey {
            kid: self.key_id.clone(),
            kty: "RSA".to_string(),
            alg: "RS256".to_string(),
            use_: "sig".to_string(),
            n: self.modulus.clone(),
            e: self.exponent.clone(),
        }
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("key_id", &self.key_id)
            .field("modulus", &self.modulus)
            .field("exponent", &self.exponent)
            .field("private_key_der", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// JWKS response (RFC 7517)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwks {
    pub keys: Vec<JsonWebKey>,
}

/// JSON Web Key (RFC 7517), RSA public parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonWebKey {
    pub kid: String, // Key ID
    pub kty: String, // Key Type ("RSA")
    pub alg: String, // Algorithm ("RS256")
    #[serde(rename = "use")]
    pub use_: String, // Public key use ("sig")
    pub n: String,   // Modulus (base64url)
    pub e: String,   // Exponent (base64url)
}

/// `POST /auth` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

/// `POST /auth` query parameters
///
/// Built from raw pairs so a repeated `expired` key is kept rather than
/// rejected by the extractor.
#[derive(Debug, Default)]
pub struct AuthQuery {
    /// Every `expired` value, in request order.
    pub expired: Vec<String>,
}

impl AuthQuery {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let expired = pairs
            .into_iter()
            .filter(|(key, _)| key == "expired")
            .map(|(_, value)| value)
            .collect();

        Self { expired }
    }

    /// Only a single `expired=true` (exact match) requests an expired token.
    /// A repeated key is a list, not the string `"true"`.
    pub fn wants_expired(&self) -> bool {
        matches!(self.expired.as_slice(), [value] if value == "true")
    }
}

/// Readiness probe response
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub signing_key: &'static str,
}
