use crate::errors::JwksError;
use crate::models::{AuthQuery, AuthResponse};
use crate::routes::AppState;
use crate::services::token_service;
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;

/// Handle token issuance
///
/// POST /auth
/// POST /auth?expired=true
///
/// Only `expired=true` (exact match) asks for a token signed by an expired
/// key; any other value, a repeated key, or none issues a normal token.
#[instrument(name = "jwks.auth.issue", skip_all, fields(expired))]
pub async fn handle_auth(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<AuthResponse>, JwksError> {
    let want_expired = AuthQuery::from_pairs(pairs).wants_expired();
    tracing::Span::current().record("expired", want_expired);

    let token =
        token_service::issue_token(&state.registry, want_expired, Utc::now().timestamp()).await?;

    Ok(Json(AuthResponse { token }))
}

/// GET, PUT, DELETE and PATCH on /auth
pub async fn method_not_allowed() -> JwksError {
    JwksError::MethodNotAllowed
}
