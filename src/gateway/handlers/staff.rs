//! Staff directory handlers

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use super::{require_admin, require_manager};
use crate::core_types::{BranchId, StaffId, StaffRole};
use crate::gateway::auth::AuthedStaff;
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiError, ApiResponse, ApiResult, created, ok};
use crate::staff::StaffProfile;

/// Create staff profile request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateStaffRequest {
    /// Identity provider subject this profile belongs to
    #[schema(example = "idp|7f3ab2c4")]
    pub owner_identity: String,
    #[schema(example = "Rosa Vane")]
    pub name: String,
    /// One of: staff, manager, admin
    pub role: StaffRole,
    /// Home branch id (ULID)
    #[schema(value_type = String, example = "01J8ZC3DM2V5W8XQR0YHBFK4TN")]
    pub branch_id: BranchId,
    /// Six digit workflow PIN
    #[schema(example = "483921")]
    pub pin: String,
}

/// Change own PIN request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePinRequest {
    #[schema(example = "483921")]
    pub current_pin: String,
    #[schema(example = "271828")]
    pub new_pin: String,
}

/// Create a staff profile
///
/// POST /api/v1/staff
///
/// One profile per owner identity; a second registration for the same
/// identity is rejected with 409.
#[utoipa::path(
    post,
    path = "/api/v1/staff",
    request_body = CreateStaffRequest,
    responses(
        (status = 201, description = "Profile created", body = ApiResponse<StaffProfile>),
        (status = 400, description = "Invalid fields or PIN"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Home branch not found"),
        (status = 409, description = "Identity already has a profile")
    ),
    security(("bearer_jwt" = [])),
    tag = "Staff"
)]
pub async fn create_staff(
    State(state): State<Arc<AppState>>,
    Extension(AuthedStaff(actor)): Extension<AuthedStaff>,
    Json(req): Json<CreateStaffRequest>,
) -> ApiResult<StaffProfile> {
    require_admin(&actor)?;
    let profile = state
        .directory
        .create_profile(
            &req.owner_identity,
            &req.name,
            req.role,
            req.branch_id,
            &req.pin,
        )
        .await?;
    created(profile)
}

/// List staff profiles
///
/// GET /api/v1/staff?branch=01J8ZC...
#[utoipa::path(
    get,
    path = "/api/v1/staff",
    params(
        ("branch" = Option<String>, Query, description = "Filter by home branch (ULID)")
    ),
    responses(
        (status = 200, description = "List of staff", body = ApiResponse<Vec<StaffProfile>>),
        (status = 403, description = "Manager or admin role required")
    ),
    security(("bearer_jwt" = [])),
    tag = "Staff"
)]
pub async fn list_staff(
    State(state): State<Arc<AppState>>,
    Extension(AuthedStaff(actor)): Extension<AuthedStaff>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Vec<StaffProfile>> {
    require_manager(&actor)?;
    let branch = match params.get("branch") {
        Some(raw) => Some(
            raw.parse::<BranchId>()
                .map_err(|_| ApiError::bad_request("Invalid branch ID format"))?,
        ),
        None => None,
    };
    let staff = state.directory.list_staff(branch).await?;
    ok(staff)
}

/// Get the calling staff member's own profile
///
/// GET /api/v1/staff/me
#[utoipa::path(
    get,
    path = "/api/v1/staff/me",
    responses(
        (status = 200, description = "Own profile", body = ApiResponse<StaffProfile>)
    ),
    security(("bearer_jwt" = [])),
    tag = "Staff"
)]
pub async fn get_own_profile(
    Extension(AuthedStaff(actor)): Extension<AuthedStaff>,
) -> ApiResult<StaffProfile> {
    ok(actor)
}

/// Get a staff profile by id
///
/// GET /api/v1/staff/{staff_id}
///
/// Staff can fetch their own profile; anyone else's requires manager.
#[utoipa::path(
    get,
    path = "/api/v1/staff/{staff_id}",
    params(
        ("staff_id" = String, Path, description = "Staff ID (ULID format)")
    ),
    responses(
        (status = 200, description = "Profile details", body = ApiResponse<StaffProfile>),
        (status = 403, description = "Manager or admin role required"),
        (status = 404, description = "Staff not found")
    ),
    security(("bearer_jwt" = [])),
    tag = "Staff"
)]
pub async fn get_staff(
    State(state): State<Arc<AppState>>,
    Extension(AuthedStaff(actor)): Extension<AuthedStaff>,
    Path(staff_id): Path<String>,
) -> ApiResult<StaffProfile> {
    let id: StaffId = staff_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid staff ID format"))?;
    if id != actor.id {
        require_manager(&actor)?;
    }
    let profile = state.directory.get_profile(id).await?;
    ok(profile)
}

/// Deactivate a staff profile
///
/// POST /api/v1/staff/{staff_id}/deactivate
///
/// Deactivated profiles can no longer log in or act; their history
/// stays on record. Idempotent.
#[utoipa::path(
    post,
    path = "/api/v1/staff/{staff_id}/deactivate",
    params(
        ("staff_id" = String, Path, description = "Staff ID (ULID format)")
    ),
    responses(
        (status = 200, description = "Deactivated profile", body = ApiResponse<StaffProfile>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Staff not found")
    ),
    security(("bearer_jwt" = [])),
    tag = "Staff"
)]
pub async fn deactivate_staff(
    State(state): State<Arc<AppState>>,
    Extension(AuthedStaff(actor)): Extension<AuthedStaff>,
    Path(staff_id): Path<String>,
) -> ApiResult<StaffProfile> {
    require_admin(&actor)?;
    let id: StaffId = staff_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid staff ID format"))?;
    let profile = state.directory.deactivate_staff(id).await?;
    ok(profile)
}

/// Change own PIN
///
/// PUT /api/v1/staff/me/pin
#[utoipa::path(
    put,
    path = "/api/v1/staff/me/pin",
    request_body = UpdatePinRequest,
    responses(
        (status = 200, description = "PIN updated"),
        (status = 400, description = "New PIN malformed"),
        (status = 401, description = "Current PIN wrong")
    ),
    security(("bearer_jwt" = [])),
    tag = "Staff"
)]
pub async fn update_own_pin(
    State(state): State<Arc<AppState>>,
    Extension(AuthedStaff(actor)): Extension<AuthedStaff>,
    Json(req): Json<UpdatePinRequest>,
) -> ApiResult<()> {
    state
        .directory
        .update_pin(actor.id, &req.current_pin, &req.new_pin)
        .await?;
    ok(())
}
