//! HTTP request handlers for the JWKS service.

pub mod auth_handler;
pub mod health;
pub mod jwks_handler;
pub mod metrics;

pub use auth_handler::{handle_auth, method_not_allowed};
pub use health::{health_check, readiness_check};
pub use jwks_handler::{handle_get_jwks, handle_get_jwks_legacy};
pub use metrics::metrics_handler;
