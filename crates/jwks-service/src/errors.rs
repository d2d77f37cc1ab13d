use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JwksError {
    #[error("No signing key available for the requested freshness")]
    NoKeyAvailable,

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl JwksError {
    /// HTTP status this error maps to at the boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            JwksError::NoKeyAvailable => StatusCode::NOT_FOUND,
            JwksError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            JwksError::KeyGeneration(_) | JwksError::Encoding(_) | JwksError::Crypto(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: &'static str,
}

impl IntoResponse for JwksError {
    fn into_response(self) -> Response {
        let (code, message) = match &self {
            JwksError::NoKeyAvailable => ("KEY_NOT_FOUND", "Key not found"),
            JwksError::KeyGeneration(_) => (
                "KEY_GENERATION_ERROR",
                "An internal key generation error occurred",
            ),
            JwksError::Encoding(_) => ("ENCODING_ERROR", "An internal encoding error occurred"),
            JwksError::Crypto(_) => (
                "CRYPTO_ERROR",
                "An internal cryptographic error occurred",
            ),
            JwksError::MethodNotAllowed => ("METHOD_NOT_ALLOWED", "Method Not Allowed"),
        };

        // Detail strings stay in the logs, never in the response body
        if self.status_code().is_server_error() {
            tracing::error!(target: "jwks.errors", error = %self, "Request failed");
        }

        let error_response = ErrorResponse {
            error: ErrorDetail { code, message },
        };

        (self.status_code(), Json(error_response)).into_response()
    }
}
