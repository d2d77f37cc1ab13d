//! Observability for the JWKS service
//!
//! Instrumentation uses `#[instrument(skip_all)]` with explicitly allow-listed
//! fields. Key ids, key states and outcomes may be logged. Private key
//! material and issued tokens must never appear in logs or metric labels.

pub mod metrics;

pub use self::metrics::{record_jwks_request, record_key_generation, record_token_issuance};

use crate::errors::JwksError;

/// Error categories for metrics labels (bounded cardinality)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Requests the service correctly refuses (no matching key, bad method)
    Client,
    /// Key generation, encoding and signing failures
    Cryptographic,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Client => "client",
            ErrorCategory::Cryptographic => "cryptographic",
        }
    }
}

impl From<&JwksError> for ErrorCategory {
    fn from(err: &JwksError) -> Self {
        match err {
            JwksError::NoKeyAvailable | JwksError::MethodNotAllowed => ErrorCategory::Client,
            JwksError::KeyGeneration(_) | JwksError::Encoding(_) | JwksError::Crypto(_) => {
                ErrorCategory::Cryptographic
            }
        }
    }
}

/// Record a failed operation under its bounded category.
pub fn record_operation_error(operation: &str, err: &JwksError) {
    self::metrics::record_error(
        operation,
        ErrorCategory::from(err).as_str(),
        err.status_code().as_u16(),
    );
}
