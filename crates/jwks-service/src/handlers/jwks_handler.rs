use crate::models::Jwks;
use crate::observability::metrics::record_jwks_request;
use crate::routes::AppState;
use crate::services::key_management_service;
use axum::{extract::State, Json};
use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;

/// Handle JWKS request
///
/// GET /.well-known/jwks.json
///
/// Returns every currently valid public key in JWKS format (RFC 7517).
#[instrument(name = "jwks.jwks.get", skip_all)]
pub async fn handle_get_jwks(State(state): State<Arc<AppState>>) -> Json<Jwks> {
    record_jwks_request("well_known");
    Json(current_jwks(&state).await)
}

/// GET /jwks
///
/// Legacy alias, same document as `/.well-known/jwks.json`.
#[instrument(name = "jwks.jwks.get_legacy", skip_all)]
pub async fn handle_get_jwks_legacy(State(state): State<Arc<AppState>>) -> Json<Jwks> {
    record_jwks_request("legacy");
    Json(current_jwks(&state).await)
}

async fn current_jwks(state: &AppState) -> Jwks {
    key_management_service::get_jwks(&state.registry, Utc::now().timestamp()).await
}
