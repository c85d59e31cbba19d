//! Product catalog and stock handlers

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::audit::AuditPage;
use crate::core_types::{BranchId, ProductId};
use crate::gateway::auth::AuthedStaff;
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiError, ApiResponse, ApiResult, created, ok};
use crate::ledger::Product;

/// Register product request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterProductRequest {
    #[schema(example = "Espresso Grinder MK4")]
    pub name: String,
    #[schema(example = "EG-MK4-0017")]
    pub sku: String,
    /// Opening stock; zero is allowed for catalog-ahead entries
    #[schema(example = 24)]
    pub quantity: u32,
    /// Branch holding the opening stock
    #[schema(value_type = String, example = "01J8ZC3DM2V5W8XQR0YHBFK4TN")]
    pub branch_id: BranchId,
    /// Registering admin's PIN
    #[schema(example = "483921")]
    pub pin: String,
}

/// Stock adjustment request
#[derive(Debug, Deserialize, ToSchema)]
pub struct AdjustStockRequest {
    /// Signed unit delta; positive adds stock, negative removes it
    #[schema(example = -3)]
    pub delta: i64,
    /// Adjusting staff member's PIN
    #[schema(example = "483921")]
    pub pin: String,
}

/// Register a product with opening stock
///
/// POST /api/v1/products
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = RegisterProductRequest,
    responses(
        (status = 201, description = "Product registered", body = ApiResponse<Product>),
        (status = 400, description = "Invalid fields"),
        (status = 401, description = "PIN mismatch"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Branch not found or inactive")
    ),
    security(("bearer_jwt" = [])),
    tag = "Products"
)]
pub async fn register_product(
    State(state): State<Arc<AppState>>,
    Extension(AuthedStaff(actor)): Extension<AuthedStaff>,
    Json(req): Json<RegisterProductRequest>,
) -> ApiResult<Product> {
    let product = state
        .ledger
        .register_stock(
            &req.name,
            &req.sku,
            req.quantity,
            req.branch_id,
            actor.id,
            &req.pin,
        )
        .await?;
    created(product)
}

/// Adjust stock outside the transfer workflow
///
/// POST /api/v1/products/{product_id}/adjust
///
/// For shrinkage, damage and stocktake corrections. Managers adjust
/// products held at their own branch; admins adjust anywhere. Every
/// adjustment lands in the audit trail.
#[utoipa::path(
    post,
    path = "/api/v1/products/{product_id}/adjust",
    params(
        ("product_id" = String, Path, description = "Product ID (ULID format)")
    ),
    request_body = AdjustStockRequest,
    responses(
        (status = 200, description = "Adjusted product", body = ApiResponse<Product>),
        (status = 400, description = "Zero delta or stock would go negative"),
        (status = 401, description = "PIN mismatch"),
        (status = 403, description = "Manager role or branch affinity missing"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_jwt" = [])),
    tag = "Products"
)]
pub async fn adjust_stock(
    State(state): State<Arc<AppState>>,
    Extension(AuthedStaff(actor)): Extension<AuthedStaff>,
    Path(product_id): Path<String>,
    Json(req): Json<AdjustStockRequest>,
) -> ApiResult<Product> {
    let id: ProductId = product_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid product ID format"))?;
    let product = state
        .ledger
        .adjust_stock(id, req.delta, actor.id, &req.pin)
        .await?;
    ok(product)
}

/// List products
///
/// GET /api/v1/products?branch=01J8ZC...
///
/// The branch filter matches a product's current (last known) location.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(
        ("branch" = Option<String>, Query, description = "Filter by current branch (ULID)")
    ),
    responses(
        (status = 200, description = "List of products", body = ApiResponse<Vec<Product>>)
    ),
    security(("bearer_jwt" = [])),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Product>> {
    let branch = match params.get("branch") {
        Some(raw) => Some(
            raw.parse::<BranchId>()
                .map_err(|_| ApiError::bad_request("Invalid branch ID format"))?,
        ),
        None => None,
    };
    let products = state.ledger.list_products(branch).await?;
    ok(products)
}

/// Get a product by id
///
/// GET /api/v1/products/{product_id}
#[utoipa::path(
    get,
    path = "/api/v1/products/{product_id}",
    params(
        ("product_id" = String, Path, description = "Product ID (ULID format)")
    ),
    responses(
        (status = 200, description = "Product details", body = ApiResponse<Product>),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_jwt" = [])),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> ApiResult<Product> {
    let id: ProductId = product_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid product ID format"))?;
    let product = state.ledger.get_product(id).await?;
    ok(product)
}

/// Get a product's movement history
///
/// GET /api/v1/products/{product_id}/history?after_seq=0&limit=100
///
/// Chronological audit entries for one product with cursor paging.
#[utoipa::path(
    get,
    path = "/api/v1/products/{product_id}/history",
    params(
        ("product_id" = String, Path, description = "Product ID (ULID format)"),
        ("after_seq" = Option<u64>, Query, description = "Resume after this sequence number"),
        ("limit" = Option<u32>, Query, description = "Page size (default: 100, max: 1000)")
    ),
    responses(
        (status = 200, description = "Movement history page", body = ApiResponse<AuditPage>)
    ),
    security(("bearer_jwt" = [])),
    tag = "Products"
)]
pub async fn product_history(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<AuditPage> {
    let id: ProductId = product_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid product ID format"))?;
    let after_seq = params.get("after_seq").and_then(|s| s.parse().ok());
    let limit = params.get("limit").and_then(|s| s.parse().ok());
    let page = state.audit_trail.product_history(id, after_seq, limit).await?;
    ok(page)
}
