//! # JWKS Test Utilities
//!
//! Shared test utilities for the JWKS service.
//!
//! This crate provides:
//! - Fixed RSA key fixtures (no key generation in test setup)
//! - Registry builders seeded from those fixtures
//! - Server test harness (TestJwksServer for E2E tests)
//! - Custom assertions (TokenAssertions trait)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jwks_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), anyhow::Error> {
//!     let server = TestJwksServer::spawn_seeded().await?;
//!
//!     let token = server.request_token(false).await?;
//!     token.assert_valid_jwt()
//!          .assert_signed_by(VALID_KEY_ID);
//!     Ok(())
//! }
//! ```

pub mod assertions;
pub mod crypto_fixtures;
pub mod server_harness;

// Re-export commonly used items
pub use assertions::{verify_with_jwks, TokenAssertions};
pub use crypto_fixtures::{
    expired_only_registry, seeded_registry, test_rsa_key, test_signing_key, valid_only_registry,
    FixtureError, EXPIRED_KEY_ID, VALID_KEY_ID,
};
pub use server_harness::TestJwksServer;
