//! OpenAPI / Swagger UI Documentation
//!
//! Auto-generated OpenAPI 3.0 documentation for the StockTransit API.
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

// Import handler types for schema registration
use crate::audit::{AuditEntry, AuditPage};
use crate::branch::Branch;
use crate::core_types::{MoveReason, StaffRole};
use crate::gateway::auth::{LoginRequest, LoginResponse};
use crate::gateway::handlers::branch::{CreateBranchRequest, UpdateBranchRequest};
use crate::gateway::handlers::health::HealthResponse;
use crate::gateway::handlers::product::{AdjustStockRequest, RegisterProductRequest};
use crate::gateway::handlers::staff::{CreateStaffRequest, UpdatePinRequest};
use crate::gateway::handlers::transfer::{
    CancelTransferRequest, InitiateTransferRequest, ReceiveTransferRequest,
};
use crate::ledger::{Product, SlipStatus, TransferSlip};
use crate::staff::StaffProfile;

/// Bearer JWT security scheme issued by POST /api/v1/auth/login
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_jwt",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Session token from POST /api/v1/auth/login. \
                             Send as: Authorization: Bearer {token}",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "StockTransit API",
        version = "1.0.0",
        description = "Multi-branch stock transfer workflow: durable transfer slips, PIN-gated hand-offs and an append-only location audit trail.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        // Public endpoints
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::auth::login,
        // Branch registry
        crate::gateway::handlers::branch::create_branch,
        crate::gateway::handlers::branch::list_branches,
        crate::gateway::handlers::branch::get_branch,
        crate::gateway::handlers::branch::update_branch,
        crate::gateway::handlers::branch::deactivate_branch,
        // Staff directory
        crate::gateway::handlers::staff::create_staff,
        crate::gateway::handlers::staff::list_staff,
        crate::gateway::handlers::staff::get_own_profile,
        crate::gateway::handlers::staff::get_staff,
        crate::gateway::handlers::staff::deactivate_staff,
        crate::gateway::handlers::staff::update_own_pin,
        // Product catalog and stock
        crate::gateway::handlers::product::register_product,
        crate::gateway::handlers::product::adjust_stock,
        crate::gateway::handlers::product::list_products,
        crate::gateway::handlers::product::get_product,
        crate::gateway::handlers::product::product_history,
        // Transfer workflow
        crate::gateway::handlers::transfer::initiate_transfer,
        crate::gateway::handlers::transfer::receive_transfer,
        crate::gateway::handlers::transfer::cancel_transfer,
        crate::gateway::handlers::transfer::list_transfers,
        crate::gateway::handlers::transfer::get_transfer,
        crate::gateway::handlers::transfer::resolve_transfer_token,
        // Audit trail
        crate::gateway::handlers::audit::query_audit,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            LoginResponse,
            CreateBranchRequest,
            UpdateBranchRequest,
            CreateStaffRequest,
            UpdatePinRequest,
            RegisterProductRequest,
            AdjustStockRequest,
            InitiateTransferRequest,
            ReceiveTransferRequest,
            CancelTransferRequest,
            Branch,
            StaffProfile,
            StaffRole,
            Product,
            TransferSlip,
            SlipStatus,
            AuditEntry,
            AuditPage,
            MoveReason,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Session tokens for staff (public login)"),
        (name = "Branches", description = "Branch registry (reference data)"),
        (name = "Staff", description = "Staff directory and PIN management"),
        (name = "Products", description = "Product catalog, stock levels and movement history"),
        (name = "Transfers", description = "Transfer slips: initiate, receive, cancel, resolve"),
        (name = "Audit", description = "Append-only location audit trail"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;
