//! Session auth handlers

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::error::TransitError;
use crate::gateway::auth::{LoginRequest, LoginResponse};
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiError, ApiResponse, ApiResult, ok};

/// Staff login
///
/// POST /api/v1/auth/login
///
/// Exchanges a staff id + PIN for a bearer token. Unknown ids and wrong
/// PINs are collapsed into one 401 so the endpoint does not confirm
/// which staff ids exist.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Unknown staff id or wrong PIN"),
        (status = 403, description = "Staff profile deactivated")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    match state.auth.login(req).await {
        Ok(resp) => ok(resp),
        Err(e @ (TransitError::NotFound { .. } | TransitError::PinMismatch)) => {
            tracing::warn!("login rejected: {e}");
            ApiError::unauthorized("Invalid staff id or PIN").into_err()
        }
        Err(e) => Err(e.into()),
    }
}
