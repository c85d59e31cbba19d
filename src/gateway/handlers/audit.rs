//! Audit trail handlers

use std::collections::HashMap;
use std::sync::Arc;

use axum::Extension;
use axum::extract::{Query, State};

use super::require_manager;
use crate::audit::{AuditPage, AuditQuery};
use crate::core_types::{BranchId, ProductId, SlipId};
use crate::gateway::auth::AuthedStaff;
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiError, ApiResponse, ApiResult, ok};

/// Query the location audit trail
///
/// GET /api/v1/audit?product_id=...&branch_id=...&slip_id=...&after_seq=0&limit=100
///
/// Entries come back in recording order with cursor paging. The branch
/// filter matches movements touching that branch on either side.
/// Cross-branch visibility, so manager role required.
#[utoipa::path(
    get,
    path = "/api/v1/audit",
    params(
        ("product_id" = Option<String>, Query, description = "Filter by product (ULID)"),
        ("branch_id" = Option<String>, Query, description = "Filter by branch on either side (ULID)"),
        ("slip_id" = Option<String>, Query, description = "Filter by transfer slip (ULID)"),
        ("after_seq" = Option<u64>, Query, description = "Resume after this sequence number"),
        ("limit" = Option<u32>, Query, description = "Page size (default: 100, max: 1000)")
    ),
    responses(
        (status = 200, description = "Audit entries page", body = ApiResponse<AuditPage>),
        (status = 400, description = "Malformed filter"),
        (status = 403, description = "Manager or admin role required")
    ),
    security(("bearer_jwt" = [])),
    tag = "Audit"
)]
pub async fn query_audit(
    State(state): State<Arc<AppState>>,
    Extension(AuthedStaff(actor)): Extension<AuthedStaff>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<AuditPage> {
    require_manager(&actor)?;
    let product_id = match params.get("product_id") {
        Some(raw) => Some(
            raw.parse::<ProductId>()
                .map_err(|_| ApiError::bad_request("Invalid product ID format"))?,
        ),
        None => None,
    };
    let branch_id = match params.get("branch_id") {
        Some(raw) => Some(
            raw.parse::<BranchId>()
                .map_err(|_| ApiError::bad_request("Invalid branch ID format"))?,
        ),
        None => None,
    };
    let slip_id = match params.get("slip_id") {
        Some(raw) => Some(
            raw.parse::<SlipId>()
                .map_err(|_| ApiError::bad_request("Invalid slip ID format"))?,
        ),
        None => None,
    };
    let query = AuditQuery {
        product_id,
        branch_id,
        slip_id,
        after_seq: params.get("after_seq").and_then(|s| s.parse().ok()),
        limit: params.get("limit").and_then(|s| s.parse().ok()),
    };
    let page = state.audit_trail.query(query).await?;
    ok(page)
}
