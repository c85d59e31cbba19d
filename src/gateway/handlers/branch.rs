//! Branch registry handlers

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use super::require_admin;
use crate::branch::Branch;
use crate::core_types::BranchId;
use crate::gateway::auth::AuthedStaff;
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiError, ApiResponse, ApiResult, created, ok};

/// Create branch request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBranchRequest {
    #[schema(example = "Harbor Point")]
    pub name: String,
    #[schema(example = "1 Pier Road, Dockside")]
    pub address: String,
}

/// Update branch request; omitted fields are left unchanged
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBranchRequest {
    #[schema(example = "Harbor Point East")]
    pub name: Option<String>,
    #[schema(example = "2 Pier Road, Dockside")]
    pub address: Option<String>,
}

/// Create a branch
///
/// POST /api/v1/branches
#[utoipa::path(
    post,
    path = "/api/v1/branches",
    request_body = CreateBranchRequest,
    responses(
        (status = 201, description = "Branch created", body = ApiResponse<Branch>),
        (status = 400, description = "Invalid name or address"),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer_jwt" = [])),
    tag = "Branches"
)]
pub async fn create_branch(
    State(state): State<Arc<AppState>>,
    Extension(AuthedStaff(actor)): Extension<AuthedStaff>,
    Json(req): Json<CreateBranchRequest>,
) -> ApiResult<Branch> {
    require_admin(&actor)?;
    let branch = state.registry.create_branch(&req.name, &req.address).await?;
    created(branch)
}

/// List branches
///
/// GET /api/v1/branches?active_only=true
///
/// Branches are returned in creation order.
#[utoipa::path(
    get,
    path = "/api/v1/branches",
    params(
        ("active_only" = Option<bool>, Query, description = "Only active branches (default: false)")
    ),
    responses(
        (status = 200, description = "List of branches", body = ApiResponse<Vec<Branch>>)
    ),
    security(("bearer_jwt" = [])),
    tag = "Branches"
)]
pub async fn list_branches(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Branch>> {
    let active_only = params
        .get("active_only")
        .and_then(|s| s.parse().ok())
        .unwrap_or(false);
    let branches = state.registry.list_branches(active_only).await?;
    ok(branches)
}

/// Get a branch by id
///
/// GET /api/v1/branches/{branch_id}
#[utoipa::path(
    get,
    path = "/api/v1/branches/{branch_id}",
    params(
        ("branch_id" = String, Path, description = "Branch ID (ULID format)")
    ),
    responses(
        (status = 200, description = "Branch details", body = ApiResponse<Branch>),
        (status = 400, description = "Malformed branch id"),
        (status = 404, description = "Branch not found")
    ),
    security(("bearer_jwt" = [])),
    tag = "Branches"
)]
pub async fn get_branch(
    State(state): State<Arc<AppState>>,
    Path(branch_id): Path<String>,
) -> ApiResult<Branch> {
    let id: BranchId = branch_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid branch ID format"))?;
    let branch = state.registry.get_branch(id).await?;
    ok(branch)
}

/// Update a branch's name or address
///
/// PATCH /api/v1/branches/{branch_id}
#[utoipa::path(
    patch,
    path = "/api/v1/branches/{branch_id}",
    params(
        ("branch_id" = String, Path, description = "Branch ID (ULID format)")
    ),
    request_body = UpdateBranchRequest,
    responses(
        (status = 200, description = "Updated branch", body = ApiResponse<Branch>),
        (status = 400, description = "Malformed id or invalid fields"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Branch not found")
    ),
    security(("bearer_jwt" = [])),
    tag = "Branches"
)]
pub async fn update_branch(
    State(state): State<Arc<AppState>>,
    Extension(AuthedStaff(actor)): Extension<AuthedStaff>,
    Path(branch_id): Path<String>,
    Json(req): Json<UpdateBranchRequest>,
) -> ApiResult<Branch> {
    require_admin(&actor)?;
    let id: BranchId = branch_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid branch ID format"))?;
    let branch = state
        .registry
        .update_branch(id, req.name.as_deref(), req.address.as_deref())
        .await?;
    ok(branch)
}

/// Deactivate a branch
///
/// POST /api/v1/branches/{branch_id}/deactivate
///
/// Deactivated branches stop accepting transfers but remain visible in
/// historic slips and audit entries. Idempotent.
#[utoipa::path(
    post,
    path = "/api/v1/branches/{branch_id}/deactivate",
    params(
        ("branch_id" = String, Path, description = "Branch ID (ULID format)")
    ),
    responses(
        (status = 200, description = "Deactivated branch", body = ApiResponse<Branch>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Branch not found")
    ),
    security(("bearer_jwt" = [])),
    tag = "Branches"
)]
pub async fn deactivate_branch(
    State(state): State<Arc<AppState>>,
    Extension(AuthedStaff(actor)): Extension<AuthedStaff>,
    Path(branch_id): Path<String>,
) -> ApiResult<Branch> {
    require_admin(&actor)?;
    let id: BranchId = branch_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid branch ID format"))?;
    let branch = state.registry.deactivate_branch(id).await?;
    ok(branch)
}
