//! JWKS Service Library
//!
//! A minimal identity-token issuer: an in-memory registry of RSA signing
//! keys, a JWKS document of the currently valid public keys, and RS256 token
//! issuance, including tokens deliberately signed by an expired key.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `crypto` - Key generation, JWK encoding, JWT signing
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `models` - Data models
//! - `repositories` - In-memory key registry
//! - `services` - Key lifecycle and token issuance

pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
