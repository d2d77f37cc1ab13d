use crate::errors::JwksError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use secrecy::{ExposeSecret, SecretBox};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::instrument;
use uuid::Uuid;

/// Modulus size for every signing key.
pub const RSA_KEY_BITS: usize = 2048;

/// The one signing algorithm this service speaks (RSASSA-PKCS1-v1_5 + SHA-256).
pub const JWT_ALGORITHM: Algorithm = Algorithm::RS256;

/// JWT Claims structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject
    pub iat: i64,    // Issued at timestamp
    pub exp: i64,    // Expiration timestamp
}

/// Public parameters and private DER exported from an RSA key.
///
/// `modulus` and `exponent` are already in JWK form (base64url, no padding).
/// The private half is PKCS#1 DER inside a `SecretBox`, so `Debug` never
/// prints it.
pub struct RsaKeyMaterial {
    pub modulus: String,
    pub exponent: String,
    pub private_key_der: SecretBox<Vec<u8>>,
}

impl fmt::Debug for RsaKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaKeyMaterial")
            .field("modulus", &self.modulus)
            .field("exponent", &self.exponent)
            .field("private_key_der", &"[REDACTED]")
            .finish()
    }
}

/// Generate a fresh key identifier.
///
/// Random v4 UUIDs; only uniqueness matters, not unpredictability.
pub fn generate_key_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generate an RSA-2048 private key from the OS CSPRNG.
///
/// CPU-bound (hundreds of milliseconds); async callers should run it on a
/// blocking thread.
#[instrument(skip_all)]
pub fn generate_rsa_private_key() -> Result<RsaPrivateKey, JwksError> {
    RsaPrivateKey::new(&mut OsRng, RSA_KEY_BITS)
        .map_err(|e| JwksError::KeyGeneration(format!("RSA keypair generation failed: {}", e)))
}

/// Export the JWK public parameters and PKCS#1 DER private key.
#[instrument(skip_all)]
pub fn export_key_material(private_key: &RsaPrivateKey) -> Result<RsaKeyMaterial, JwksError> {
    let modulus = encode_hex_integer(&private_key.n().to_str_radix(16))?;
    let exponent = encode_hex_integer(&private_key.e().to_str_radix(16))?;

    let der = private_key
        .to_pkcs1_der()
        .map_err(|e| JwksError::KeyGeneration(format!("PKCS#1 export failed: {}", e)))?;

    Ok(RsaKeyMaterial {
        modulus,
        exponent,
        private_key_der: SecretBox::new(Box::new(der.as_bytes().to_vec())),
    })
}

/// Base64url (no padding) of an unsigned big-endian byte string.
pub fn encode_unsigned_be(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Encode an integer given as hex digits into JWK form.
///
/// Odd-length hex is left-padded with a single `0` before decoding so that
/// e.g. `10001` becomes the bytes `01 00 01` and not a shifted value.
pub fn encode_hex_integer(hex_digits: &str) -> Result<String, JwksError> {
    if hex_digits.is_empty() {
        return Err(JwksError::Encoding("empty integer".to_string()));
    }

    let padded = if hex_digits.len() % 2 == 1 {
        format!("0{}", hex_digits)
    } else {
        hex_digits.to_string()
    };

    let bytes = hex::decode(&padded)
        .map_err(|e| JwksError::Encoding(format!("invalid hex integer: {}", e)))?;

    Ok(encode_unsigned_be(&bytes))
}

/// Encode a numeric public exponent into JWK form.
pub fn encode_exponent(exponent: u64) -> Result<String, JwksError> {
    encode_hex_integer(&format!("{:x}", exponent))
}

/// Sign JWT with an RSA private key (PKCS#1 DER), RS256
#[instrument(skip_all)]
pub fn sign_jwt(
    claims: &Claims,
    private_key_der: &SecretBox<Vec<u8>>,
    key_id: &str,
) -> Result<String, JwksError> {
    let encoding_key = EncodingKey::from_rsa_der(private_key_der.expose_secret());

    let mut header = Header::new(JWT_ALGORITHM);
    header.kid = Some(key_id.to_string());

    encode(&header, claims, &encoding_key)
        .map_err(|e| JwksError::Crypto(format!("JWT signing operation failed: {}", e)))
}

/// Verify an RS256 JWT against JWK public parameters.
///
/// With `validate_exp` off only the signature is checked, which is how an
/// intentionally expired token is inspected.
#[instrument(skip_all)]
pub fn verify_jwt(
    token: &str,
    modulus: &str,
    exponent: &str,
    validate_exp: bool,
) -> Result<Claims, JwksError> {
    let decoding_key = DecodingKey::from_rsa_components(modulus, exponent)
        .map_err(|e| JwksError::Encoding(format!("invalid public key components: {}", e)))?;

    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.validate_exp = validate_exp;
    validation.leeway = 0;
    if !validate_exp {
        validation.required_spec_claims.clear();
    }

    let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::debug!(target: "crypto", error = %e, "Token verification failed");
        JwksError::Crypto(format!("JWT verification failed: {}", e))
    })?;

    Ok(token_data.claims)
}
