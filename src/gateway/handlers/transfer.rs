//! Transfer workflow handlers

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::core_types::{BranchId, ProductId, SlipId};
use crate::gateway::auth::AuthedStaff;
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiError, ApiResponse, ApiResult, created, ok};
use crate::ledger::{InitiateRequest, SlipFilter, SlipStatus, TransferSlip};

/// Initiate transfer request
#[derive(Debug, Deserialize, ToSchema)]
pub struct InitiateTransferRequest {
    #[schema(value_type = String, example = "01J8ZC9QK7P2M4NDXW5VGT8RHE")]
    pub product_id: ProductId,
    /// Units to move
    #[schema(example = 3)]
    pub quantity: u32,
    /// Origin branch; must be the initiator's home branch
    #[schema(value_type = String, example = "01J8ZC3DM2V5W8XQR0YHBFK4TN")]
    pub from_branch: BranchId,
    #[schema(value_type = String, example = "01J8ZC5RT9A1B6CEFG2HJKMNPQ")]
    pub to_branch: BranchId,
    /// Initiator's PIN
    #[schema(example = "483921")]
    pub pin: String,
    /// Free-form note shown on the slip
    #[schema(example = "Replacing the broken grinder at Harbor Point")]
    pub notes: Option<String>,
}

/// Receive transfer request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReceiveTransferRequest {
    /// Receiver's PIN
    #[schema(example = "271828")]
    pub pin: String,
}

/// Cancel transfer request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CancelTransferRequest {
    /// Canceller's PIN
    #[schema(example = "483921")]
    pub pin: String,
}

/// Initiate a stock transfer
///
/// POST /api/v1/transfers
///
/// Atomically debits the origin stock, opens an in-transit slip and
/// records the departure in the audit trail. The caller becomes the
/// slip's initiator and must work at the origin branch.
#[utoipa::path(
    post,
    path = "/api/v1/transfers",
    request_body = InitiateTransferRequest,
    responses(
        (status = 201, description = "Slip created, stock in transit", body = ApiResponse<TransferSlip>),
        (status = 400, description = "Same-branch transfer or zero quantity"),
        (status = 401, description = "PIN mismatch"),
        (status = 403, description = "Initiator does not work at the origin branch"),
        (status = 404, description = "Product or branch not found"),
        (status = 422, description = "Insufficient stock at origin")
    ),
    security(("bearer_jwt" = [])),
    tag = "Transfers"
)]
pub async fn initiate_transfer(
    State(state): State<Arc<AppState>>,
    Extension(AuthedStaff(actor)): Extension<AuthedStaff>,
    Json(req): Json<InitiateTransferRequest>,
) -> ApiResult<TransferSlip> {
    let slip = state
        .ledger
        .initiate_transfer(InitiateRequest {
            product_id: req.product_id,
            quantity: req.quantity,
            from_branch: req.from_branch,
            to_branch: req.to_branch,
            initiator_staff_id: actor.id,
            pin: req.pin,
            notes: req.notes,
        })
        .await?;
    created(slip)
}

/// Receive an in-transit transfer
///
/// POST /api/v1/transfers/{slip_id}/receive
///
/// Atomically credits the destination stock, moves the product's
/// location, completes the slip and records the arrival. The caller
/// must work at the destination branch.
#[utoipa::path(
    post,
    path = "/api/v1/transfers/{slip_id}/receive",
    params(
        ("slip_id" = String, Path, description = "Slip ID (ULID format)")
    ),
    request_body = ReceiveTransferRequest,
    responses(
        (status = 200, description = "Transfer completed", body = ApiResponse<TransferSlip>),
        (status = 401, description = "PIN mismatch"),
        (status = 403, description = "Receiver does not work at the destination branch"),
        (status = 404, description = "Slip not found"),
        (status = 409, description = "Slip is not in transit")
    ),
    security(("bearer_jwt" = [])),
    tag = "Transfers"
)]
pub async fn receive_transfer(
    State(state): State<Arc<AppState>>,
    Extension(AuthedStaff(actor)): Extension<AuthedStaff>,
    Path(slip_id): Path<String>,
    Json(req): Json<ReceiveTransferRequest>,
) -> ApiResult<TransferSlip> {
    let id: SlipId = slip_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid slip ID format"))?;
    let slip = state.ledger.receive_transfer(id, actor.id, &req.pin).await?;
    ok(slip)
}

/// Cancel an in-transit transfer
///
/// POST /api/v1/transfers/{slip_id}/cancel
///
/// Returns the units to the origin branch without touching the
/// product's location. Only the initiator or a manager may cancel.
#[utoipa::path(
    post,
    path = "/api/v1/transfers/{slip_id}/cancel",
    params(
        ("slip_id" = String, Path, description = "Slip ID (ULID format)")
    ),
    request_body = CancelTransferRequest,
    responses(
        (status = 200, description = "Transfer cancelled, stock restored", body = ApiResponse<TransferSlip>),
        (status = 401, description = "PIN mismatch"),
        (status = 403, description = "Caller is neither initiator nor manager"),
        (status = 404, description = "Slip not found"),
        (status = 409, description = "Slip is not in transit")
    ),
    security(("bearer_jwt" = [])),
    tag = "Transfers"
)]
pub async fn cancel_transfer(
    State(state): State<Arc<AppState>>,
    Extension(AuthedStaff(actor)): Extension<AuthedStaff>,
    Path(slip_id): Path<String>,
    Json(req): Json<CancelTransferRequest>,
) -> ApiResult<TransferSlip> {
    let id: SlipId = slip_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid slip ID format"))?;
    let slip = state.ledger.cancel_transfer(id, actor.id, &req.pin).await?;
    ok(slip)
}

/// List transfer slips
///
/// GET /api/v1/transfers?status=in_transit&branch=...&product_id=...&limit=50&offset=0
///
/// Newest first. The branch filter matches either endpoint of a slip.
#[utoipa::path(
    get,
    path = "/api/v1/transfers",
    params(
        ("status" = Option<String>, Query, description = "Filter: in_transit, completed or cancelled"),
        ("branch" = Option<String>, Query, description = "Filter by origin or destination branch (ULID)"),
        ("product_id" = Option<String>, Query, description = "Filter by product (ULID)"),
        ("limit" = Option<u32>, Query, description = "Page size (default: 100, max: 1000)"),
        ("offset" = Option<u32>, Query, description = "Skip this many slips")
    ),
    responses(
        (status = 200, description = "List of slips", body = ApiResponse<Vec<TransferSlip>>),
        (status = 400, description = "Unknown status or malformed filter")
    ),
    security(("bearer_jwt" = [])),
    tag = "Transfers"
)]
pub async fn list_transfers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Vec<TransferSlip>> {
    let status = match params.get("status").map(|s| s.as_str()) {
        None => None,
        Some("in_transit") => Some(SlipStatus::InTransit),
        Some("completed") => Some(SlipStatus::Completed),
        Some("cancelled") => Some(SlipStatus::Cancelled),
        Some(other) => {
            return ApiError::bad_request(format!(
                "Unknown status '{other}'. Valid values: in_transit, completed, cancelled"
            ))
            .into_err();
        }
    };
    let branch = match params.get("branch") {
        Some(raw) => Some(
            raw.parse::<BranchId>()
                .map_err(|_| ApiError::bad_request("Invalid branch ID format"))?,
        ),
        None => None,
    };
    let product_id = match params.get("product_id") {
        Some(raw) => Some(
            raw.parse::<ProductId>()
                .map_err(|_| ApiError::bad_request("Invalid product ID format"))?,
        ),
        None => None,
    };
    let filter = SlipFilter {
        status,
        branch,
        product_id,
        limit: params.get("limit").and_then(|s| s.parse().ok()),
        offset: params.get("offset").and_then(|s| s.parse().ok()),
    };
    let slips = state.ledger.list_slips(&filter).await?;
    ok(slips)
}

/// Get a transfer slip by id
///
/// GET /api/v1/transfers/{slip_id}
#[utoipa::path(
    get,
    path = "/api/v1/transfers/{slip_id}",
    params(
        ("slip_id" = String, Path, description = "Slip ID (ULID format)")
    ),
    responses(
        (status = 200, description = "Slip details", body = ApiResponse<TransferSlip>),
        (status = 404, description = "Slip not found")
    ),
    security(("bearer_jwt" = [])),
    tag = "Transfers"
)]
pub async fn get_transfer(
    State(state): State<Arc<AppState>>,
    Path(slip_id): Path<String>,
) -> ApiResult<TransferSlip> {
    let id: SlipId = slip_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid slip ID format"))?;
    let slip = state.ledger.get_slip(id).await?;
    ok(slip)
}

/// Resolve a scanned slip token
///
/// GET /api/v1/transfers/resolve/{token}
///
/// Looks up the slip behind a printed "ST1..." token regardless of its
/// status, so receiving staff can scan first and decide after.
#[utoipa::path(
    get,
    path = "/api/v1/transfers/resolve/{token}",
    params(
        ("token" = String, Path, description = "Printed slip token (ST1 prefix)")
    ),
    responses(
        (status = 200, description = "Slip details", body = ApiResponse<TransferSlip>),
        (status = 400, description = "Malformed or corrupted token"),
        (status = 404, description = "Token valid but slip unknown")
    ),
    security(("bearer_jwt" = [])),
    tag = "Transfers"
)]
pub async fn resolve_transfer_token(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> ApiResult<TransferSlip> {
    let slip = state.ledger.resolve_slip_by_token(&token).await?;
    ok(slip)
}
